/*! Wire types: values, locators, commands, responses, errors, ids. */

mod command;
mod element_data;
mod error;
mod ids;
mod locator;
mod value;

pub use command::{
  AttributesPayload, BatchPayload, CollectionPayload, Command, CommandEnvelope, ErrorBody,
  MessagePayload, PointMissPayload, ResponseEnvelope, TextPayload,
};
pub use element_data::{AXElementData, AXElementDescription, ValueFormat};
pub use error::{AxResult, Error};
pub use ids::{Pid, SubscriptionToken};
pub use locator::{Criterion, Locator, MatchMode, PathStep};
pub use value::AttributeValue;

//! Input data model: design elements, canvas and invitation metadata

pub mod element;
pub mod invitation;
pub mod style;

pub use element::{DesignElement, ElementKind, ElementSlot, MalformedElement, Position, Size};
pub use invitation::{
    parse_timestamp, Canvas, Invitation, InvitationDocument, InvitationSettings, RsvpInfo,
};
pub use style::{ElementStyle, FontWeight, Length, LineStyle, TextAlign, VerticalAlign};

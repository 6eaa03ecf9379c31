//! Shared domain types for the VoCart voice-shopping core.
//!
//! Every crate in the workspace speaks these types: catalog entries as the
//! upstream feed delivers them, parsed voice commands, canonical units,
//! pricing snapshots, and the confirmation payloads for the two ambiguity
//! machines (brand selection and substitute proposals).

pub mod catalog;
pub mod command;
pub mod error;
pub mod pricing;
pub mod proposal;
pub mod unit;

pub use catalog::CatalogEntry;
pub use command::{
    ApplyMode, CommandAction, CommandFilters, Confidence, ParsedCommand, ParserSource,
};
pub use error::{CoreError, CoreResult};
pub use pricing::{MergedQuantity, PricingMode, PricingSnapshot, money_label};
pub use proposal::{
    BrandSelectionConfirmation, BrandSelectionProposal, ProposalOption, RequestedItem,
    SubstituteConfirmation, SubstituteProposal,
};
pub use unit::{Unit, UnitFamily};

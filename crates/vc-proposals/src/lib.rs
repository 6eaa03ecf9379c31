//! Confirmation state machines for VoCart.
//!
//! Two interactions pause a command until the shopper answers: picking
//! between brands, and approving a substitute for an unavailable item.
//! Both park their pending state in-memory under a single-use token
//! with a fixed TTL; whatever is not confirmed in time simply expires.

pub mod brand;
pub mod confirmations;
pub mod substitute;

pub use brand::{
    BrandSelectionService, MAX_BRAND_OPTIONS, PendingBrandSelection, build_brand_selection,
};
pub use confirmations::{ConfirmationStore, DEFAULT_CONFIRMATION_TTL_MINUTES};
pub use substitute::{
    MAX_SUBSTITUTE_OPTIONS, SubstituteService, SubstitutionPreferences, build_substitute_proposal,
};

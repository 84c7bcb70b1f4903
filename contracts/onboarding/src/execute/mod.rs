//! Execute handlers for the onboarding contract.
//!
//! This module contains all execute message handlers, organized by category:
//! - `governance` - Params, token pair and pool management
//! - `admin` - Admin transfer (propose/accept/cancel)

mod admin;
mod governance;

pub use admin::*;
pub use governance::*;

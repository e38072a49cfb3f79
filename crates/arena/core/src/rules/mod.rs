//! Pure rule functions shared by validation and the scheduler.
//!
//! Nothing here touches state; callers look up the catalog row and pass in
//! the numbers.
pub mod combat;
pub mod economy;
pub mod geometry;
pub mod trees;

// handlers/mod.rs - 3-Tier Handler Architecture
//
// Public (no auth) -> Protected (bearer token, optional role gate) -> Elevated (admin only)

pub mod elevated;  // Tier 3: admin role (/api/v1/users/*)
pub mod protected; // Tier 2: bearer token required
pub mod public;    // Tier 1: no authentication required

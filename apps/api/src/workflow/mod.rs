// Resume tailoring wizard: step machine, review draft, refine targeting, and the
// HTTP handlers that drive a session through it.

pub mod controller;
pub mod handlers;
pub mod refine_target;
pub mod review;
pub mod step;
pub mod view;

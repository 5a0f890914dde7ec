// Guided Section Generator wizard.
// Implements: session model, session controller, HTTP handlers.
// All Question/Answer Service calls go through qa_client — no direct HTTP here.

pub mod controller;
pub mod handlers;
pub mod session;

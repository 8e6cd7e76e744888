// Skill pipeline: lexicon → matcher → counts → demand ranks → gap report.
// Everything here is pure and synchronous; handlers own the async edges.

pub mod gap;
pub mod handlers;
pub mod lexicon;
pub mod matcher;
pub mod models;
pub mod ranker;

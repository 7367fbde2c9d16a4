//! Post domain: records, create input, overview projection and the
//! operations over them.

mod model;
mod service;

pub use model::{today, NewPost, Post, PostOverview, CREATED_DATE_FORMAT};
pub use service::PostService;

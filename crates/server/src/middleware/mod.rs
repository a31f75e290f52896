mod identity;
mod model_loaders;

pub use identity::{USER_ID_HEADER, require_identity};
pub use model_loaders::{
    load_feed_post_middleware, load_project_middleware, load_task_middleware,
    load_workspace_middleware,
};

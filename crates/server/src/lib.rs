use std::sync::Arc;

use db::DBService;
use services::services::{
    activity::ActivityService,
    feed::FeedService,
    membership::{InviteService, LocalInviteService, MembershipService},
    task_update::TaskService,
};

pub mod error;
pub mod http;
pub mod middleware;
pub mod routes;

#[derive(Clone)]
pub struct AppState {
    db: DBService,
    tasks: TaskService,
    membership: MembershipService,
    feed: FeedService,
    activity: ActivityService,
    invites: Arc<dyn InviteService>,
}

impl AppState {
    pub fn new(db: DBService) -> Self {
        Self::with_invite_service(db, Arc::new(LocalInviteService))
    }

    pub fn with_invite_service(db: DBService, invites: Arc<dyn InviteService>) -> Self {
        Self {
            db,
            tasks: TaskService::new(),
            membership: MembershipService::new(),
            feed: FeedService::new(),
            activity: ActivityService::new(),
            invites,
        }
    }

    pub fn db(&self) -> &DBService {
        &self.db
    }

    pub fn tasks(&self) -> &TaskService {
        &self.tasks
    }

    pub fn membership(&self) -> &MembershipService {
        &self.membership
    }

    pub fn feed(&self) -> &FeedService {
        &self.feed
    }

    pub fn activity(&self) -> &ActivityService {
        &self.activity
    }

    pub fn invites(&self) -> &dyn InviteService {
        self.invites.as_ref()
    }
}

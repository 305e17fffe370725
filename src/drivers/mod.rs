//! Control loops that repeatedly invoke a source and a store.
//!
//! - [`scheduler`]: wall-clock poll loop for the weather collector, stops on
//!   an external shutdown request
//! - [`pagination`]: page-by-page crawl for the news collector, stops on the
//!   first end-of-pages signal or aborts on a fatal error
//!
//! Both drivers are strictly sequential: one request in flight at a time.

pub mod pagination;
pub mod scheduler;

pub use pagination::harvest_news;
pub use scheduler::SchedulerDriver;

pub mod models;
pub mod normalize;
pub mod reconciler;

pub use models::RawListing;
pub use normalize::NormalizedListing;
pub use reconciler::{
    import_listings, reconcile, EngagementDrop, ImportReport, NoRepostDetection, RepostSignal,
};

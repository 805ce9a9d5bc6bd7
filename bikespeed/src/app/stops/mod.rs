mod intersection_lookup;
mod stop_sign_record;
mod stops_error;
mod stops_ops;
mod street_names;

pub use intersection_lookup::{IntersectionLookup, IntersectionQuery, IntersectionRow};
pub use stop_sign_record::StopSignRecord;
pub use stops_error::StopsError;
pub use stops_ops::{
    read_stop_entries, run, split_intersection, SplitIntersection, StopSignEntry,
    INTERSECTION_TAG, STOP_STREET_TAG, STOP_SIGN_TAG,
};
pub use street_names::StreetNameNormalizer;

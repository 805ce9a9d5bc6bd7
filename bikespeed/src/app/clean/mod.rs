mod age_density;
mod clean_error;
mod clean_ops;
mod cleaned_row;
mod emme_tables;
mod time_band;

pub use age_density::{sample_ages, AgeBracket, AgeDensity, AGE_BRACKETS};
pub use clean_error::CleanError;
pub use clean_ops::{
    add_emme_stats, add_user_stats, clean_data, clean_trip, filter_missing_survey_vals,
    read_joined_trips, run,
};
pub use cleaned_row::CleanedRow;
pub use emme_tables::{EmmeAttributes, EmmeLinkRow, EmmeTables, EmmeVolumeRow};
pub use time_band::TimeBand;

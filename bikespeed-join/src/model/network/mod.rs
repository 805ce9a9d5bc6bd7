mod network_link;
pub(crate) mod road_network;
mod signal_layer;

pub use network_link::{NetworkLink, NetworkLinkRow};
pub use road_network::RoadNetwork;
pub use signal_layer::{nearest_signal_distance, SignalJunction, SignalLayer};

/// parses an optional numeric cell. blank cells, including the single-space
/// placeholders found in centreline exports, are None.
pub(crate) fn parse_optional<T: std::str::FromStr>(value: &str) -> Option<T> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        trimmed.parse::<T>().ok()
    }
}

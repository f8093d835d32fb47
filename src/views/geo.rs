use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::employee::EmployeeRecord;
use crate::views::grouping::{Category, group_by};

/// Where unknown cities cluster (centre of India).
pub const DEFAULT_COORD: (f64, f64) = (20.5937, 78.9629);
/// Initial viewport of the map view.
pub const MAP_CENTER: (f64, f64) = (22.5937, 78.9629);
pub const MAP_ZOOM: u8 = 5;
/// Unknown cities land within this many degrees of [`DEFAULT_COORD`] on each axis.
const UNKNOWN_SPREAD: f64 = 5.0;

static CITY_COORDINATES: Lazy<HashMap<&'static str, (f64, f64)>> = Lazy::new(|| {
    HashMap::from([
        ("Mumbai", (19.0760, 72.8777)),
        ("Delhi", (28.7041, 77.1025)),
        ("Bangalore", (12.9716, 77.5946)),
        ("Hyderabad", (17.3850, 78.4867)),
        ("Chennai", (13.0827, 80.2707)),
        ("Kolkata", (22.5726, 88.3639)),
        ("Pune", (18.5204, 73.8567)),
        ("Ahmedabad", (23.0225, 72.5714)),
        ("Jaipur", (26.9124, 75.7873)),
        ("Surat", (21.1702, 72.8311)),
        ("Lucknow", (26.8467, 80.9462)),
        ("Kanpur", (26.4499, 80.3319)),
        ("Nagpur", (21.1458, 79.0882)),
        ("Indore", (22.7196, 75.8577)),
        ("Thane", (19.2183, 72.9781)),
        ("Bhopal", (23.2599, 77.4126)),
        ("Visakhapatnam", (17.6868, 83.2185)),
        ("Pimpri-Chinchwad", (18.6298, 73.7997)),
        ("Patna", (25.5941, 85.1376)),
        ("Vadodara", (22.3072, 73.1812)),
        ("Ghaziabad", (28.6692, 77.4538)),
        ("Ludhiana", (30.9010, 75.8573)),
        ("Agra", (27.1767, 78.0081)),
        ("Nashik", (20.0110, 73.7903)),
        ("Faridabad", (28.4089, 77.3178)),
        ("Meerut", (28.9845, 77.7064)),
        ("Rajkot", (22.3039, 70.8022)),
        ("Kalyan-Dombivli", (19.2403, 73.1305)),
        ("Vasai-Virar", (19.3919, 72.8397)),
        ("Varanasi", (25.3176, 82.9739)),
        ("Srinagar", (34.0837, 74.7973)),
        ("Aurangabad", (19.8762, 75.3433)),
        ("Dhanbad", (23.7957, 86.4304)),
        ("Amritsar", (31.6340, 74.8723)),
        ("Navi Mumbai", (19.0330, 73.0297)),
        ("Allahabad", (25.4358, 81.8463)),
        ("Howrah", (22.5958, 88.2636)),
        ("Ranchi", (23.3441, 85.3096)),
        ("Gwalior", (26.2183, 78.1828)),
        ("Jabalpur", (23.1815, 79.9864)),
        ("Coimbatore", (11.0168, 76.9558)),
        ("Vijayawada", (16.5062, 80.6480)),
        ("Jodhpur", (26.2389, 73.0243)),
        ("Madurai", (9.9252, 78.1198)),
        ("Raipur", (21.2514, 81.6296)),
        ("Kota", (25.2138, 75.8648)),
        ("Guwahati", (26.1445, 91.7362)),
        ("Chandigarh", (30.7333, 76.7794)),
        ("Solapur", (17.6599, 75.9064)),
        ("Hubli-Dharwad", (15.3647, 75.1240)),
        ("Bareilly", (28.3670, 79.4304)),
        ("Moradabad", (28.8386, 78.7733)),
        ("Mysore", (12.2958, 76.6394)),
        ("Gurgaon", (28.4595, 77.0266)),
        ("Aligarh", (27.8974, 78.0880)),
        ("Jalandhar", (31.3260, 75.5762)),
        ("Tiruchirappalli", (10.7905, 78.7047)),
        ("Bhubaneswar", (20.2961, 85.8245)),
        ("Salem", (11.6643, 78.1460)),
        ("Mira-Bhayandar", (19.2952, 72.8544)),
        ("Warangal", (17.9689, 79.5941)),
        ("Thiruvananthapuram", (8.5241, 76.9366)),
        ("Bhiwandi", (19.2813, 73.0483)),
        ("Saharanpur", (29.9640, 77.5460)),
        ("Guntur", (16.3067, 80.4365)),
        ("Amravati", (20.9320, 77.7523)),
        ("Bikaner", (28.0229, 73.3119)),
        ("Noida", (28.5355, 77.3910)),
        ("Jamshedpur", (22.8046, 86.2029)),
        ("Bhilai", (21.1938, 81.3509)),
        ("Cuttack", (20.4625, 85.8830)),
        ("Firozabad", (27.1599, 78.3956)),
        ("Kochi", (9.9312, 76.2673)),
        ("Bhavnagar", (21.7645, 72.1519)),
        ("Dehradun", (30.3165, 78.0322)),
        ("Durgapur", (23.5204, 87.3119)),
        ("Asansol", (23.6739, 86.9524)),
        ("Nanded", (19.1383, 77.3210)),
        ("Kolhapur", (16.7050, 74.2433)),
        ("Ajmer", (26.4499, 74.6399)),
        ("Gulbarga", (17.3297, 76.8343)),
        ("Jamnagar", (22.4707, 70.0577)),
        ("Ujjain", (23.1765, 75.9261)),
        ("Loni", (28.7501, 77.2882)),
        ("Siliguri", (26.7271, 88.3953)),
        ("Jhansi", (25.4484, 78.5685)),
        ("Ulhasnagar", (19.2215, 73.1645)),
        ("Nellore", (14.4426, 79.9865)),
        ("Jammu", (32.7266, 74.8570)),
        ("Sangli-Miraj & Kupwad", (16.8524, 74.5815)),
        ("Belgaum", (15.8497, 74.4977)),
        ("Mangalore", (12.9141, 74.8560)),
        ("Ambattur", (13.1143, 80.1548)),
        ("Tirunelveli", (8.7139, 77.7567)),
        ("Malegaon", (20.5537, 74.5281)),
        ("Gaya", (24.7914, 85.0002)),
        ("Jalgaon", (21.0077, 75.5626)),
        ("Udaipur", (24.5854, 73.7125)),
        ("Maheshtala", (22.5097, 88.2541)),
    ])
});

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MapMarker {
    #[schema(example = "Pune")]
    pub city: String,
    /// `[latitude, longitude]`
    #[schema(value_type = Vec<f64>, example = json!([18.5204, 73.8567]))]
    pub coordinates: [f64; 2],
    #[schema(example = 2)]
    pub employee_count: usize,
    pub employees: Vec<EmployeeRecord>,
}

/// Known coordinate of `city`, if it is in the table.
pub fn known_coordinates(city: &str) -> Option<(f64, f64)> {
    CITY_COORDINATES.get(city).copied()
}

/// Placement for `city`: the table entry, or a stable spot near the default.
pub fn coordinates_for(city: &str) -> (f64, f64) {
    known_coordinates(city).unwrap_or_else(|| {
        let hash = fnv1a(city.as_bytes());
        let lat_offset = unit_fraction(hash >> 32) - 0.5;
        let lng_offset = unit_fraction(hash & 0xffff_ffff) - 0.5;
        (
            DEFAULT_COORD.0 + lat_offset * UNKNOWN_SPREAD,
            DEFAULT_COORD.1 + lng_offset * UNKNOWN_SPREAD,
        )
    })
}

/// One marker per city bucket, in first-seen order.
pub fn map_markers(records: &[EmployeeRecord]) -> Vec<MapMarker> {
    group_by(records, Category::City)
        .into_buckets()
        .into_iter()
        .map(|bucket| {
            let (lat, lng) = coordinates_for(&bucket.label);
            MapMarker {
                employee_count: bucket.count(),
                coordinates: [lat, lng],
                city: bucket.label,
                employees: bucket.members,
            }
        })
        .collect()
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf2_9ce4_8422_2325, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(0x0100_0000_01b3)
    })
}

fn unit_fraction(bits: u64) -> f64 {
    (bits & 0xffff_ffff) as f64 / (u64::from(u32::MAX) + 1) as f64
}

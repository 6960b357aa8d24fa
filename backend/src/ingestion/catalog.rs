//! Static reference data: regions to fetch and the datasets they can be fetched from

use crate::ingestion::types::{Region, Source};

/// Ordered list of regions; fetch runs walk it front to back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionCatalog {
    regions: Vec<Region>,
}

impl RegionCatalog {
    pub fn new(regions: Vec<Region>) -> Self {
        RegionCatalog { regions }
    }

    /// Built-in sample of Indian states, three districts each
    pub fn india() -> Self {
        RegionCatalog::new(vec![
            Region::new("Andhra Pradesh", &["Visakhapatnam", "Guntur", "Krishna"]),
            Region::new("Telangana", &["Hyderabad", "Warangal", "Nizamabad"]),
            Region::new("Odisha", &["Baleshwar", "Cuttack", "Khordha"]),
            Region::new("Tamil Nadu", &["Chennai", "Coimbatore", "Madurai"]),
            Region::new("Maharashtra", &["Mumbai", "Pune", "Nagpur"]),
            Region::new("Karnataka", &["Bengaluru Urban", "Mysuru", "Hubli"]),
            Region::new("Uttar Pradesh", &["Lucknow", "Kanpur", "Varanasi"]),
            Region::new("West Bengal", &["Kolkata", "Howrah", "Darjeeling"]),
            Region::new("Rajasthan", &["Jaipur", "Jodhpur", "Udaipur"]),
            Region::new("Gujarat", &["Ahmedabad", "Surat", "Vadodara"]),
            Region::new("Punjab", &["Ludhiana", "Amritsar", "Jalandhar"]),
            Region::new("Haryana", &["Gurgaon", "Faridabad", "Panipat"]),
            Region::new("Bihar", &["Patna", "Gaya", "Muzaffarpur"]),
            Region::new("Kerala", &["Thiruvananthapuram", "Kochi", "Kozhikode"]),
            Region::new("Madhya Pradesh", &["Bhopal", "Indore", "Jabalpur"]),
            Region::new("Assam", &["Kamrup", "Dibrugarh", "Cachar"]),
            Region::new("Jharkhand", &["Ranchi", "Jamshedpur", "Dhanbad"]),
            Region::new("Chhattisgarh", &["Raipur", "Durg", "Bilaspur"]),
            Region::new("Himachal Pradesh", &["Shimla", "Kullu", "Kangra"]),
            Region::new("Uttarakhand", &["Dehradun", "Haridwar", "Nainital"]),
            Region::new("Goa", &["North Goa", "South Goa", "Panaji"]),
            Region::new("Manipur", &["Imphal West", "Imphal East", "Churachandpur"]),
            Region::new("Meghalaya", &["East Khasi Hills", "West Garo Hills", "Ri Bhoi"]),
            Region::new("Mizoram", &["Aizawl", "Lunglei", "Champhai"]),
            Region::new("Nagaland", &["Kohima", "Dimapur", "Mokokchung"]),
            Region::new("Sikkim", &["East Sikkim", "West Sikkim", "South Sikkim"]),
            Region::new("Tripura", &["West Tripura", "Sepahijala", "Dhalai"]),
            Region::new("Arunachal Pradesh", &["Tawang", "Papum Pare", "West Siang"]),
        ])
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn district_count(&self) -> usize {
        self.regions.iter().map(|r| r.districts.len()).sum()
    }
}

/// Datasets that can be fetched, keyed by short name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRegistry {
    sources: Vec<Source>,
}

impl SourceRegistry {
    pub fn new(sources: Vec<Source>) -> Self {
        SourceRegistry { sources }
    }

    /// India-WRIS datasets served by the portal
    pub fn india_wris() -> Self {
        SourceRegistry::new(vec![
            Source {
                key: "groundwater".to_string(),
                endpoint: "Ground Water Level".to_string(),
                agency: "CGWB".to_string(),
            },
            Source {
                key: "rainfall".to_string(),
                endpoint: "RainFall".to_string(),
                agency: "CWC".to_string(),
            },
        ])
    }

    pub fn get(&self, key: &str) -> Option<&Source> {
        self.sources.iter().find(|s| s.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|s| s.key.as_str())
    }
}

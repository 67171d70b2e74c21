//! Static directory of spreadsheet tabs.
//!
//! Order matters: the resolver returns the first entry that matches, so
//! "Bri Free" wins over "Bri VIP" for a bare "bri" token.

/// One named tab of the spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetDirectoryEntry {
    /// Human-readable "Name Tier" label, also the tab title.
    pub name: &'static str,
    /// Spreadsheet grid id (`gid`) of the tab.
    pub grid_id: u64,
}

impl SheetDirectoryEntry {
    pub const fn new(name: &'static str, grid_id: u64) -> Self {
        Self { name, grid_id }
    }

    /// First whitespace-separated word of the name, e.g. `"Emily"` for "Emily Ray Free".
    pub fn first_word(&self) -> &'static str {
        self.name.split(' ').next().unwrap_or(self.name)
    }
}

pub static SHEET_DIRECTORY: &[SheetDirectoryEntry] = &[
    SheetDirectoryEntry::new("Alaya Paid", 2096299055),
    SheetDirectoryEntry::new("Alix Free", 1109464436),
    SheetDirectoryEntry::new("Amber Paid", 68202088),
    SheetDirectoryEntry::new("Angela Paid", 661502868),
    SheetDirectoryEntry::new("Autumn Free", 475314965),
    SheetDirectoryEntry::new("Autumn Paid", 642095320),
    SheetDirectoryEntry::new("Bri Free", 1269410297),
    SheetDirectoryEntry::new("Bri VIP", 1245086286),
    SheetDirectoryEntry::new("Coco VIP", 1635596190),
    SheetDirectoryEntry::new("Colby Free", 1632280389),
    SheetDirectoryEntry::new("Dan Paid", 1694644436),
    SheetDirectoryEntry::new("Emily Ray Free", 165366325),
    SheetDirectoryEntry::new("Emmie Free", 1062337858),
    SheetDirectoryEntry::new("Essie Paid", 1298371478),
    SheetDirectoryEntry::new("Forrest Paid", 1237467666),
    SheetDirectoryEntry::new("Jaileen Free", 1751209681),
    SheetDirectoryEntry::new("Jaileen VIP", 658317867),
    SheetDirectoryEntry::new("Kelly Paid", 1934645087),
    SheetDirectoryEntry::new("Kenzie Free", 783014756),
    SheetDirectoryEntry::new("Laila Paid", 1075461981),
    SheetDirectoryEntry::new("Lala Free", 2140596445),
    SheetDirectoryEntry::new("Lala VIP", 956812246),
    SheetDirectoryEntry::new("McKinley Free", 1425642455),
    SheetDirectoryEntry::new("Mel Free", 1162339048),
    SheetDirectoryEntry::new("Michelle Free", 1234072977),
    SheetDirectoryEntry::new("MJ Paid", 1210054249),
    SheetDirectoryEntry::new("Nicole Free", 166958570),
    SheetDirectoryEntry::new("Sage VIP", 1188324103),
    SheetDirectoryEntry::new("Salah VIP", 111829368),
    SheetDirectoryEntry::new("Sirena Paid", 623356977),
    SheetDirectoryEntry::new("Sky Free", 2141458380),
    SheetDirectoryEntry::new("Sophie Paid", 1926685400),
    SheetDirectoryEntry::new("Tita VIP", 285787704),
    SheetDirectoryEntry::new("V Free", 577942680),
];

/// Exact (case-sensitive) lookup by tab name.
pub fn entry_by_name(name: &str) -> Option<&'static SheetDirectoryEntry> {
    SHEET_DIRECTORY.iter().find(|e| e.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_has_all_tabs_with_unique_ids() {
        assert_eq!(SHEET_DIRECTORY.len(), 34);
        let mut ids: Vec<u64> = SHEET_DIRECTORY.iter().map(|e| e.grid_id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 34);
    }

    #[test]
    fn first_word_of_multi_word_name() {
        let e = entry_by_name("Emily Ray Free").unwrap();
        assert_eq!(e.first_word(), "Emily");
        assert_eq!(entry_by_name("V Free").unwrap().first_word(), "V");
    }

    #[test]
    fn free_tier_precedes_vip_for_shared_names() {
        let pos = |n: &str| SHEET_DIRECTORY.iter().position(|e| e.name == n).unwrap();
        assert!(pos("Bri Free") < pos("Bri VIP"));
        assert!(pos("Lala Free") < pos("Lala VIP"));
    }
}

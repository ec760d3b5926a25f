//! Supported-county registry for the county records data source.

/// Counties the records source indexes. Lookups for anything else fail
/// fast before a network call is made.
pub const SUPPORTED_COUNTIES: &[&str] = &[
    "ADAIR",
    "ALFALFA",
    "ATOKA",
    "BEAVER",
    "BECKHAM",
    "BLAINE",
    "BRYAN",
    "CARTER",
    "CHEROKEE",
    "CHOCTAW",
    "CIMARRON",
    "COAL",
    "COMANCHE",
    "COTTON",
    "CRAIG",
    "CREEK",
    "CUSTER",
    "DELAWARE",
    "DEWEY",
    "ELLIS",
    "GARVIN",
    "GRADY",
    "GRANT",
    "GREER",
    "HARMON",
    "HARPER",
    "HASKELL",
    "HUGHES",
    "JACKSON",
    "JEFFERSON",
    "JOHNSTON",
    "KAY",
    "KINGFISHER",
    "KIOWA",
    "LATIMER",
    "LEFLORE",
    "LINCOLN",
    "LOGAN",
    "LOVE",
    "MCCLAIN",
    "MCCURTAIN",
    "MCINTOSH",
    "MAJOR",
    "MARSHALL",
    "MAYES",
    "MURRAY",
    "MUSKOGEE",
    "NOBLE",
    "NOWATA",
    "OKFUSKEE",
    "OKMULGEE",
    "OSAGE",
    "OTTAWA",
    "PAWNEE",
    "PITTSBURG",
    "PONTOTOC",
    "POTTAWATOMIE",
    "PUSHMATAHA",
    "ROGER MILLS",
    "SEMINOLE",
    "SEQUOYAH",
    "STEPHENS",
    "TEXAS",
    "TILLMAN",
    "WASHINGTON",
    "WASHITA",
    "WOODWARD",
];

/// Case-insensitive membership check.
pub fn is_supported(county: &str) -> bool {
    let upper = county.trim().to_uppercase();
    SUPPORTED_COUNTIES.contains(&upper.as_str())
}

//! Static SATCAT code tables.
//!
//! Loaded once on first use and never mutated.
use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::models::UNKNOWN;

pub type CodeTable = HashMap<&'static str, &'static str>;

/// Looks `code` up in `table`, falling back to `"Unknown"`.
pub fn resolve(code: &str, table: &CodeTable) -> &'static str {
    table.get(code.trim()).copied().unwrap_or(UNKNOWN)
}

/// Same as [`resolve`] for optional upstream fields.
pub fn resolve_opt(code: Option<&str>, table: &CodeTable) -> &'static str {
    code.map_or(UNKNOWN, |code| resolve(code, table))
}

fn table(pairs: &[(&'static str, &'static str)]) -> CodeTable {
    pairs.iter().copied().collect()
}

/// Owner code to owning entity.
pub static OWNERS: Lazy<CodeTable> = Lazy::new(|| table(&OWNERS_PAIRS));

/// Owner code to ISO 3166 alpha-2 code used for flag paths.
pub static OWNER_COUNTRY_CODES: Lazy<CodeTable> = Lazy::new(|| table(&OWNER_COUNTRY_CODES_PAIRS));

pub static OPS_STATUSES: Lazy<CodeTable> = Lazy::new(|| table(&OPS_STATUSES_PAIRS));

pub static OBJECT_TYPES: Lazy<CodeTable> = Lazy::new(|| table(&OBJECT_TYPES_PAIRS));

pub static ORBIT_TYPES: Lazy<CodeTable> = Lazy::new(|| table(&ORBIT_TYPES_PAIRS));

pub static LAUNCH_SITES: Lazy<CodeTable> = Lazy::new(|| table(&LAUNCH_SITES_PAIRS));

const OWNERS_PAIRS: [(&str, &str); 126] = [
    ("AB", "Arab Satellite Communications Organization"),
    ("ABS", "Asia Broadcast Satellite"),
    ("AC", "Asia Satellite Telecommunications Company (ASIASAT)"),
    ("ALG", "Algeria"),
    ("ANG", "Angola"),
    ("ARGN", "Argentina"),
    ("ARM", "Republic of Armenia"),
    ("ASRA", "Austria"),
    ("AUS", "Australia"),
    ("AZER", "Azerbaijan"),
    ("BEL", "Belgium"),
    ("BELA", "Belarus"),
    ("BERM", "Bermuda"),
    ("BGD", "People's Republic of Bangladesh"),
    ("BHUT", "Kingdom of Bhutan"),
    ("BOL", "Bolivia"),
    ("BRAZ", "Brazil"),
    ("BUL", "Bulgaria"),
    ("CA", "Canada"),
    ("CHBZ", "China/Brazil"),
    ("CHTU", "China/Turkey"),
    ("CHLE", "Chile"),
    ("CIS", "Commonwealth of Independent States (former USSR)"),
    ("COL", "Colombia"),
    ("CRI", "Republic of Costa Rica"),
    ("CZCH", "Czech Republic (former Czechoslovakia)"),
    ("DEN", "Denmark"),
    ("DJI", "Republic of Djibouti"),
    ("ECU", "Ecuador"),
    ("EGYP", "Egypt"),
    ("ESA", "European Space Agency"),
    ("ESRO", "European Space Research Organization"),
    ("EST", "Estonia"),
    ("ETH", "Ethiopia"),
    ("EUME", "European Organization for the Exploitation of Meteorological Satellites (EUMETSAT)"),
    ("EUTE", "European Telecommunications Satellite Organization (EUTELSAT)"),
    ("FGER", "France/Germany"),
    ("FIN", "Finland"),
    ("FR", "France"),
    ("FRIT", "France/Italy"),
    ("GER", "Germany"),
    ("GHA", "Republic of Ghana"),
    ("GLOB", "Globalstar"),
    ("GREC", "Greece"),
    ("GRSA", "Greece/Saudi Arabia"),
    ("GUAT", "Guatemala"),
    ("HUN", "Hungary"),
    ("IM", "International Mobile Satellite Organization (INMARSAT)"),
    ("IND", "India"),
    ("INDO", "Indonesia"),
    ("IRAN", "Iran"),
    ("IRAQ", "Iraq"),
    ("IRID", "Iridium"),
    ("IRL", "Ireland"),
    ("ISRA", "Israel"),
    ("ISRO", "Indian Space Research Organisation"),
    ("ISS", "International Space Station"),
    ("IT", "Italy"),
    ("ITSO", "International Telecommunications Satellite Organization (INTELSAT)"),
    ("JPN", "Japan"),
    ("KAZ", "Kazakhstan"),
    ("KEN", "Republic of Kenya"),
    ("LAOS", "Laos"),
    ("LKA", "Democratic Socialist Republic of Sri Lanka"),
    ("LTU", "Lithuania"),
    ("LUXE", "Luxembourg"),
    ("MA", "Morocco"),
    ("MALA", "Malaysia"),
    ("MCO", "Principality of Monaco"),
    ("MDA", "Republic of Moldova"),
    ("MEX", "Mexico"),
    ("MMR", "Republic of the Union of Myanmar"),
    ("MNG", "Mongolia"),
    ("MUS", "Mauritius"),
    ("NATO", "North Atlantic Treaty Organization"),
    ("NETH", "Netherlands"),
    ("NICO", "New ICO"),
    ("NIG", "Nigeria"),
    ("NKOR", "Democratic People's Republic of Korea"),
    ("NOR", "Norway"),
    ("NPL", "Federal Democratic Republic of Nepal"),
    ("NZ", "New Zealand"),
    ("O3B", "O3b Networks"),
    ("ORB", "ORBCOMM"),
    ("PAKI", "Pakistan"),
    ("PERU", "Peru"),
    ("POL", "Poland"),
    ("POR", "Portugal"),
    ("PRC", "People's Republic of China"),
    ("PRY", "Republic of Paraguay"),
    ("PRES", "People's Republic of China/European Space Agency"),
    ("QAT", "State of Qatar"),
    ("RASC", "RascomStar-QAF"),
    ("ROC", "Taiwan (Republic of China)"),
    ("ROM", "Romania"),
    ("RP", "Philippines (Republic of the Philippines)"),
    ("RWA", "Republic of Rwanda"),
    ("SAFR", "South Africa"),
    ("SAUD", "Saudi Arabia"),
    ("SDN", "Republic of Sudan"),
    ("SEAL", "Sea Launch"),
    ("SES", "SES"),
    ("SGJP", "Singapore/Japan"),
    ("SING", "Singapore"),
    ("SKOR", "Republic of Korea"),
    ("SPN", "Spain"),
    ("STCT", "Singapore/Taiwan"),
    ("SVN", "Slovenia"),
    ("SWED", "Sweden"),
    ("SWTZ", "Switzerland"),
    ("TBD", "To Be Determined"),
    ("THAI", "Thailand"),
    ("TMMC", "Turkmenistan/Monaco"),
    ("TUN", "Republic of Tunisia"),
    ("TURK", "Turkey"),
    ("UAE", "United Arab Emirates"),
    ("UK", "United Kingdom"),
    ("UKR", "Ukraine"),
    ("UNK", "Unknown"),
    ("URY", "Uruguay"),
    ("US", "United States"),
    ("USBZ", "United States/Brazil"),
    ("VAT", "Vatican City State"),
    ("VENZ", "Venezuela"),
    ("VTNM", "Vietnam"),
    ("ZWE", "Republic of Zimbabwe"),
];

const OWNER_COUNTRY_CODES_PAIRS: [(&str, &str); 126] = [
    ("AB", "sa"),
    ("ABS", "hk"),
    ("AC", "hk"),
    ("ALG", "dz"),
    ("ANG", "ao"),
    ("ARGN", "ar"),
    ("ARM", "am"),
    ("ASRA", "at"),
    ("AUS", "au"),
    ("AZER", "az"),
    ("BEL", "be"),
    ("BELA", "by"),
    ("BERM", "bm"),
    ("BGD", "bd"),
    ("BHUT", "bt"),
    ("BOL", "bo"),
    ("BRAZ", "br"),
    ("BUL", "bg"),
    ("CA", "ca"),
    ("CHBZ", "cn"),
    ("CHTU", "cn"),
    ("CHLE", "cl"),
    ("CIS", "ru"),
    ("COL", "co"),
    ("CRI", "cr"),
    ("CZCH", "cz"),
    ("DEN", "dk"),
    ("DJI", "dj"),
    ("ECU", "ec"),
    ("EGYP", "eg"),
    ("ESA", "eu"),
    ("ESRO", "eu"),
    ("EST", "ee"),
    ("ETH", "et"),
    ("EUME", "eu"),
    ("EUTE", "eu"),
    ("FGER", "fr"),
    ("FIN", "fi"),
    ("FR", "fr"),
    ("FRIT", "fr"),
    ("GER", "de"),
    ("GHA", "gh"),
    ("GLOB", "us"),
    ("GREC", "gr"),
    ("GRSA", "gr"),
    ("GUAT", "gt"),
    ("HUN", "hu"),
    ("IM", "gb"),
    ("IND", "in"),
    ("INDO", "id"),
    ("IRAN", "ir"),
    ("IRAQ", "iq"),
    ("IRID", "us"),
    ("IRL", "ie"),
    ("ISRA", "il"),
    ("ISRO", "in"),
    ("ISS", "us"),
    ("IT", "it"),
    ("ITSO", "us"),
    ("JPN", "jp"),
    ("KAZ", "kz"),
    ("KEN", "ke"),
    ("LAOS", "la"),
    ("LKA", "lk"),
    ("LTU", "lt"),
    ("LUXE", "lu"),
    ("MA", "ma"),
    ("MALA", "my"),
    ("MCO", "mc"),
    ("MDA", "md"),
    ("MEX", "mx"),
    ("MMR", "mm"),
    ("MNG", "mn"),
    ("MUS", "mu"),
    ("NATO", "us"),
    ("NETH", "nl"),
    ("NICO", "us"),
    ("NIG", "ng"),
    ("NKOR", "kp"),
    ("NOR", "no"),
    ("NPL", "np"),
    ("NZ", "nz"),
    ("O3B", "lu"),
    ("ORB", "us"),
    ("PAKI", "pk"),
    ("PERU", "pe"),
    ("POL", "pl"),
    ("POR", "pt"),
    ("PRC", "cn"),
    ("PRY", "py"),
    ("PRES", "cn"),
    ("QAT", "qa"),
    ("RASC", "zw"),
    ("ROC", "tw"),
    ("ROM", "ro"),
    ("RP", "ph"),
    ("RWA", "rw"),
    ("SAFR", "za"),
    ("SAUD", "sa"),
    ("SDN", "sd"),
    ("SEAL", "us"),
    ("SES", "lu"),
    ("SGJP", "sg"),
    ("SING", "sg"),
    ("SKOR", "kr"),
    ("SPN", "es"),
    ("STCT", "sg"),
    ("SVN", "si"),
    ("SWED", "se"),
    ("SWTZ", "ch"),
    ("TBD", "us"),
    ("THAI", "th"),
    ("TMMC", "tm"),
    ("TUN", "tn"),
    ("TURK", "tr"),
    ("UAE", "ae"),
    ("UK", "gb"),
    ("UKR", "ua"),
    ("UNK", "unk"),
    ("URY", "uy"),
    ("US", "us"),
    ("USBZ", "us"),
    ("VAT", "va"),
    ("VENZ", "ve"),
    ("VTNM", "vn"),
    ("ZWE", "zw"),
];

const OPS_STATUSES_PAIRS: [(&str, &str); 8] = [
    ("+", "Operational"),
    ("-", "Nonoperational"),
    ("P", "Partially Operational"),
    ("B", "Backup/Standby"),
    ("S", "Spare"),
    ("X", "Extended Mission"),
    ("D", "Decayed"),
    ("?", "Unknown"),
];

const OBJECT_TYPES_PAIRS: [(&str, &str); 4] = [
    ("PAY", "Payload"),
    ("R/B", "Rocket body"),
    ("DEB", "Other debris"),
    ("UNK", "Unknown"),
];

const ORBIT_TYPES_PAIRS: [(&str, &str); 5] = [
    ("ORB", "Orbit"),
    ("LAN", "Landing"),
    ("IMP", "Impact"),
    ("DOC", "Docked to another object in the SATCAT"),
    ("R/T", "Roundtrip"),
];

const LAUNCH_SITES_PAIRS: [(&str, &str); 60] = [
    ("AFETR", "Air Force Eastern Test Range"),
    ("AFWTR", "Air Force Western Test Range"),
    ("ALEXA", "Alexander Launch Facility"),
    ("ALM", "Alcantara Launch Center"),
    ("BA", "Baikonur Cosmodrome"),
    ("BIK", "Bikini Atoll"),
    ("BRO", "Broglio Space Center"),
    ("CAP", "Cape Canaveral"),
    ("CAS", "Caspian Sea"),
    ("EKA", "Eka Pad 2"),
    ("ELM", "Elmendorf Air Force Base"),
    ("ESMR", "Esrange"),
    ("FPK", "Fort Polk"),
    ("GAN", "Guam Naval Station"),
    ("GTI", "Grand Turk Island"),
    ("HOB", "Hobbs Island"),
    ("JIU", "Jiuquan Space Center"),
    ("KAP", "Kapustin Yar"),
    ("KAU", "Kauai Test Facility"),
    ("KAZ", "Kazakhstan"),
    ("KEA", "Kea Track"),
    ("KMR", "Kwajalein Missile Range"),
    ("KOD", "Kodiak Launch Complex"),
    ("KOU", "Kourou"),
    ("KYM", "Kymer"),
    ("MA", "Mahia Peninsula"),
    ("MAS", "Masudpur"),
    ("MT", "Matagorda Island"),
    ("MUR", "Musudan-ri"),
    ("NOR", "Naro Space Center"),
    ("OCA", "Oca Pad"),
    ("OHI", "O'Higgins Base"),
    ("PAL", "Palmas Pad"),
    ("PALM", "Palmer Station"),
    ("PLE", "Plesetsk Cosmodrome"),
    ("PTK", "Point Thomson"),
    ("SANM", "San Marco Platform"),
    ("SEA", "Sea Launch"),
    ("SEGA", "Segar"),
    ("SHAR", "Satish Dhawan Space Centre (SHAR)"),
    ("SHEL", "Shelton"),
    ("SIMP", "Simpad"),
    ("SRI", "Sriharikota"),
    ("SSC", "Shanxi"),
    ("SVOB", "Svobodny"),
    ("TAIY", "Taiyuan"),
    ("TAN", "Tanegashima"),
    ("TERA", "Tereshkova"),
    ("TEX", "Tex Pad"),
    ("TNUG", "Tonghae Satellite Launching Ground"),
    ("TTS", "Titusville"),
    ("UKRA", "Ukrainian Cosmodrome"),
    ("UZH", "Uzhgorod"),
    ("WAL", "Wallops Island"),
    ("WLP", "Woomera"),
    ("WSAL", "Western Sahara"),
    ("XLC", "Xichang"),
    ("YAV", "Yavne Launch Facility"),
    ("YSLA", "Yellow Sea Launch Area"),
    ("YUN", "Yunsong Launch Site"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(resolve("PAY", &OBJECT_TYPES), "Payload");
        assert_eq!(resolve("R/B", &OBJECT_TYPES), "Rocket body");
        assert_eq!(resolve("+", &OPS_STATUSES), "Operational");
        assert_eq!(resolve("US", &OWNERS), "United States");
        assert_eq!(resolve("PRC", &OWNER_COUNTRY_CODES), "cn");
        assert_eq!(resolve("TAIY", &LAUNCH_SITES), "Taiyuan");
        assert_eq!(resolve("DOC", &ORBIT_TYPES), "Docked to another object in the SATCAT");
    }

    #[test]
    fn test_unknown_codes() {
        assert_eq!(resolve("ZZZ", &OBJECT_TYPES), "Unknown");
        assert_eq!(resolve("", &OWNERS), "Unknown");
        assert_eq!(resolve_opt(None, &LAUNCH_SITES), "Unknown");
    }

    #[test]
    fn test_surrounding_whitespace() {
        assert_eq!(resolve(" DEB ", &OBJECT_TYPES), "Other debris");
    }

    #[test]
    fn test_owner_tables_agree() {
        for code in OWNERS.keys() {
            assert!(OWNER_COUNTRY_CODES.contains_key(code), "missing country code for {code}");
        }
    }
}

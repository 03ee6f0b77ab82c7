//! Nonbreaking prefixes: words whose trailing period does not end a sentence.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prefix {
    /// The period always belongs to the word.
    Always,
    /// The period belongs to the word only when a number follows.
    NumericOnly,
}

const EN: &[&str] = &[
    "Adj", "Adm", "Adv", "Asst", "Bart", "Bldg", "Brig", "Bros", "Capt", "Cmdr", "Col", "Comdr",
    "Con", "Corp", "Cpl", "DR", "Dr", "Drs", "Ens", "Gen", "Gov", "Hon", "Hr", "Hosp", "Insp",
    "Lt", "MM", "MR", "MRS", "MS", "Maj", "Messrs", "Mlle", "Mme", "Mr", "Mrs", "Ms", "Msgr",
    "Op", "Ord", "Pfc", "Ph", "Prof", "Pvt", "Rep", "Reps", "Res", "Rev", "Rt", "Sen", "Sens",
    "Sfc", "Sgt", "Sr", "St", "Supt", "Surg", "v", "vs", "Jan", "Feb", "Mar", "Apr", "Jun",
    "Jul", "Aug", "Sep", "Sept", "Oct", "Nov", "Dec",
];
const EN_NUMERIC: &[&str] = &["No", "Nos", "Art", "Nr", "pp"];

const DE: &[&str] = &[
    "Abs", "Abt", "Dr", "Prof", "Hr", "Fr", "Frl", "bzw", "ca", "evtl", "ggf", "inkl", "usw",
    "vgl", "Str", "Jh", "Jhd", "Tel", "Jan", "Feb", "Apr", "Aug", "Sept", "Okt", "Nov", "Dez",
];
const DE_NUMERIC: &[&str] = &["Nr", "Art", "Abb"];

const FR: &[&str] = &[
    "M", "MM", "Mme", "Mmes", "Mlle", "Mlles", "Mgr", "Dr", "Pr", "Prof", "St", "Ste", "av",
    "bd", "cf", "janv", "févr", "avr", "juil", "sept", "oct", "nov", "déc",
];
const FR_NUMERIC: &[&str] = &["No", "Nos", "art", "p"];

const ES: &[&str] = &[
    "Sr", "Sra", "Srta", "Dr", "Dra", "Ud", "Uds", "Lic", "Ing", "Prof", "av", "pág", "etc",
];
const ES_NUMERIC: &[&str] = &["No", "núm", "art"];

const IT: &[&str] = &[
    "Sig", "Sigg", "Dott", "Prof", "Avv", "Ing", "Geom", "Arch", "ecc", "pag", "sec",
];
const IT_NUMERIC: &[&str] = &["n", "nr", "art"];

fn tables(lang: &str) -> (&'static [&'static str], &'static [&'static str]) {
    match lang {
        "de" => (DE, DE_NUMERIC),
        "fr" => (FR, FR_NUMERIC),
        "es" => (ES, ES_NUMERIC),
        "it" => (IT, IT_NUMERIC),
        _ => (EN, EN_NUMERIC),
    }
}

/// Looks `word` up in the prefix table of `lang`, falling back to English.
pub fn lookup(lang: &str, word: &str) -> Option<Prefix> {
    let mut chars = word.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        // Initials
        if c.is_uppercase() {
            return Some(Prefix::Always);
        }
    }

    let (always, numeric) = tables(lang);
    if always.contains(&word) {
        Some(Prefix::Always)
    } else if numeric.contains(&word) {
        Some(Prefix::NumericOnly)
    } else {
        None
    }
}

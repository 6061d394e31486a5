//! Categorical field encoders.
//!
//! Every encoder trims surrounding whitespace and compares case-insensitively.
//! They are total: any input string maps to a code, unknown values fall back
//! to a fixed default rather than failing.
//!
//! | field            | codes                                                        |
//! |------------------|--------------------------------------------------------------|
//! | sex              | male=1, anything else=0                                      |
//! | housing          | free=0, own=1, anything else (rent, empty)=2                 |
//! | saving accounts  | little=1, moderate=2, quite rich=3, rich=4, anything else=0  |
//! | checking account | little=1, moderate=2, rich=3, anything else=0                |
//! | purpose          | one-hot over [`PURPOSE_CATEGORIES`], all-zero when unmatched |

/// Loan purposes in one-hot slot order.
pub const PURPOSE_CATEGORIES: [&str; 8] = [
    "radio/TV",
    "education",
    "furniture/equipment",
    "car",
    "business",
    "domestic appliances",
    "repairs",
    "vacation/others",
];

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Encode sex: `male` → 1, everything else → 0.
///
/// There is no `female` case: the training column is binary.
pub fn encode_sex(s: &str) -> u8 {
    match normalize(s).as_str() {
        "male" => 1,
        _ => 0,
    }
}

/// Encode housing: `own` → 1, `free` → 0, everything else → 2.
pub fn encode_housing(s: &str) -> u8 {
    match normalize(s).as_str() {
        "own" => 1,
        "free" => 0,
        _ => 2,
    }
}

/// Encode saving account status.
///
/// Empty input and unrecognised input both map to 0, the same code the
/// training data used for "no savings account on record".
pub fn encode_saving_accounts(s: &str) -> u8 {
    match normalize(s).as_str() {
        "little" => 1,
        "moderate" => 2,
        "quite rich" => 3,
        "rich" => 4,
        _ => 0,
    }
}

/// Encode checking account status: `little` → 1, `moderate` → 2, `rich` → 3, else 0.
pub fn encode_checking_account(s: &str) -> u8 {
    match normalize(s).as_str() {
        "little" => 1,
        "moderate" => 2,
        "rich" => 3,
        _ => 0,
    }
}

/// One-hot encode a loan purpose over [`PURPOSE_CATEGORIES`].
///
/// Sets 1.0 at the first matching category. An unmatched purpose yields an
/// all-zero vector.
pub fn encode_purpose(s: &str) -> [f64; PURPOSE_CATEGORIES.len()] {
    let mut slots = [0.0; PURPOSE_CATEGORIES.len()];
    let input = normalize(s);
    if let Some(i) = PURPOSE_CATEGORIES
        .iter()
        .position(|c| c.to_lowercase() == input)
    {
        slots[i] = 1.0;
    }
    slots
}

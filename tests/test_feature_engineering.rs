//! Integration test: derived passenger features

use polars::prelude::*;
use titanic::feature_engineering::{clean_data, extract_title, FamilyType};
use titanic::TitanicError;

fn braund_and_cumings() -> DataFrame {
    df!(
        "PassengerId" => &[1i64, 2],
        "Survived" => &[0i64, 1],
        "Pclass" => &[3i64, 1],
        "Name" => &[
            "Braund, Mr. Owen Harris",
            "Cumings, Mrs. John Bradley (Florence Briggs Thayer)",
        ],
        "SibSp" => &[1i64, 1],
        "Parch" => &[0i64, 0],
        "Ticket" => &["A/5 21171", "PC 17599"],
        "Fare" => &[7.25, 71.2833],
        "Embarked" => &["S", "C"],
    )
    .unwrap()
}

fn strings(df: &DataFrame, name: &str) -> Vec<Option<String>> {
    df.column(name)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect()
}

fn ints(df: &DataFrame, name: &str) -> Vec<Option<i64>> {
    df.column(name).unwrap().i64().unwrap().into_iter().collect()
}

#[test]
fn test_braund_and_cumings() {
    let df = clean_data(braund_and_cumings()).unwrap();

    assert_eq!(strings(&df, "Title"), vec![Some("Mr".into()), Some("Mrs".into())]);
    assert_eq!(strings(&df, "Ticket_2letter"), vec![Some("A/".into()), Some("PC".into())]);
    assert_eq!(ints(&df, "Ticket_len"), vec![Some(9), Some(8)]);
    assert_eq!(ints(&df, "Fam_size"), vec![Some(2), Some(2)]);
    assert_eq!(strings(&df, "Fam_type"), vec![Some("Small".into()), Some("Small".into())]);
}

#[test]
fn test_original_columns_are_kept() {
    let raw = braund_and_cumings();
    let width = raw.width();
    let df = clean_data(raw).unwrap();

    assert_eq!(df.width(), width + 5);
    assert_eq!(df.height(), 2);
    assert!(df.column("Fare").is_ok());
    assert!(df.column("Survived").is_ok());
}

#[test]
fn test_family_size_and_bins_over_range() {
    let sibsp: Vec<i64> = (0..=10).collect();
    let parch: Vec<i64> = vec![0; 11];
    let names: Vec<String> = (0..11).map(|i| format!("Doe{}, Mr. John", i)).collect();
    let tickets: Vec<String> = (0..11).map(|i| format!("T{}", i)).collect();

    let df = df!(
        "Name" => &names,
        "Ticket" => &tickets,
        "SibSp" => &sibsp,
        "Parch" => &parch,
    )
    .unwrap();
    let df = clean_data(df).unwrap();

    let sizes = ints(&df, "Fam_size");
    let types = strings(&df, "Fam_type");
    for (i, (size, kind)) in sizes.iter().zip(types.iter()).enumerate() {
        let size = size.unwrap();
        assert_eq!(size, sibsp[i] + parch[i] + 1);
        let expected = FamilyType::from_size(size).unwrap().to_string();
        assert_eq!(kind.as_deref(), Some(expected.as_str()));
    }
    assert_eq!(types[0].as_deref(), Some("Solo"));
    assert_eq!(types[3].as_deref(), Some("Small"));
    assert_eq!(types[6].as_deref(), Some("Big"));
    assert_eq!(types[10].as_deref(), Some("Very big"));
}

#[test]
fn test_title_extraction_is_stable() {
    for name in [
        "Heikkinen, Miss. Laina",
        "Palsson, Master. Gosta Leonard",
        "Rothes, the Countess. of (Lucy Noel Martha Dyer-Edwards)",
    ] {
        let first = extract_title(name).unwrap();
        assert_eq!(extract_title(name), Some(first));
    }
    assert_eq!(
        extract_title("Rothes, the Countess. of (Lucy Noel Martha Dyer-Edwards)"),
        Some("the Countess")
    );
}

#[test]
fn test_missing_ticket_column() {
    let df = braund_and_cumings().drop("Ticket").unwrap();
    let err = clean_data(df).unwrap_err();
    assert!(matches!(err, TitanicError::FeatureNotFound(ref c) if c == "Ticket"));
}

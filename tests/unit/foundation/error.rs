use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SquareshotError::invalid_input("x")
            .to_string()
            .contains("invalid input:")
    );
    assert!(
        SquareshotError::render("x")
            .to_string()
            .contains("render failure:")
    );
    assert!(
        SquareshotError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SquareshotError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn only_invalid_input_reports_as_invalid_input() {
    assert!(SquareshotError::invalid_input("size").is_invalid_input());
    assert!(!SquareshotError::render("oom").is_invalid_input());
    assert!(!SquareshotError::serde("json").is_invalid_input());
}

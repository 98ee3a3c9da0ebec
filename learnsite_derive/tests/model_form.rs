use learnsite::ModelForm;
use learnsite::forms::{FormData, ModelForm as _, REQUIRED};

#[derive(Debug, PartialEq, ModelForm)]
struct SignupForm {
    #[form(max_length = 8)]
    username: String,
    age: i32,
}

fn data(pairs: &[(&str, &str)]) -> FormData {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_fields_follow_declaration_order() {
    assert_eq!(SignupForm::FIELDS, &["username", "age"]);
}

#[test]
fn test_bind_cleans_every_field() {
    let form = SignupForm::bind(&data(&[("username", "  ada "), ("age", "36")])).unwrap();
    assert_eq!(
        form,
        SignupForm {
            username: "ada".into(),
            age: 36
        }
    );
}

#[test]
fn test_bind_collects_all_errors() {
    let errors = SignupForm::bind(&data(&[("username", "ada_lovelace"), ("extra", "x")])).unwrap_err();
    assert_eq!(
        errors.get("username"),
        Some(&["Ensure this value has at most 8 characters (it has 12).".to_string()][..])
    );
    assert_eq!(errors.get("age"), Some(&[REQUIRED.to_string()][..]));
    assert!(errors.get("extra").is_none());
}

#[test]
fn test_bind_reports_parse_errors() {
    let errors = SignupForm::bind(&data(&[("username", "ada"), ("age", "old")])).unwrap_err();
    assert_eq!(errors.get("age"), Some(&["Enter a whole number.".to_string()][..]));
    assert!(errors.get("username").is_none());
}

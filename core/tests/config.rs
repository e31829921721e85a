use chrono::NaiveDate;
use crawler_core::config::Config;
use crawler_core::Error;
use pretty_assertions::assert_eq;

#[test]
fn default_configuration_is_valid() {
    let config = Config::default();
    config.validate().expect("defaults validate");

    assert_eq!(config.harvest.app_id, 1_382_330);
    assert_eq!(config.harvest.batch_size, 100);
    assert_eq!(config.fetch.page_size, 100);
    assert!(config.harvest.window().expect("no window").is_none());
}

#[test]
fn zero_batch_size_is_rejected() {
    let mut config = Config::default();
    config.harvest.batch_size = 0;
    assert!(config.validate().is_err());
}

#[test]
fn empty_base_url_is_rejected() {
    let mut config = Config::default();
    config.fetch.base_url = String::new();
    assert!(config.validate().is_err());
}

#[test]
fn one_sided_window_is_rejected() {
    let mut config = Config::default();
    config.harvest.window_start = Some("2021-01-01".to_string());
    assert!(config.validate().is_err());
}

#[test]
fn window_bounds_parse_to_dates() {
    let mut config = Config::default();
    config.harvest.window_start = Some("2021-01-01".to_string());
    config.harvest.window_end = Some("2021-06-30".to_string());
    config.validate().expect("window validates");

    let (start, end) = config.harvest.window().expect("parses").expect("present");
    assert_eq!(start, NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
    assert_eq!(end, NaiveDate::from_ymd_opt(2021, 6, 30).unwrap());
}

#[test]
fn malformed_window_date_fails_before_any_fetch() {
    let mut config = Config::default();
    config.harvest.window_start = Some("01/02/2021".to_string());
    config.harvest.window_end = Some("2021-06-30".to_string());

    // validate() refuses the config outright...
    assert!(config.validate().is_err());
    // ...and the parse error itself is a DateParse.
    assert!(matches!(
        config.harvest.window().unwrap_err(),
        Error::DateParse(_)
    ));
}

#[test]
fn inverted_window_is_rejected() {
    let mut config = Config::default();
    config.harvest.window_start = Some("2021-06-30".to_string());
    config.harvest.window_end = Some("2021-01-01".to_string());

    assert!(matches!(
        config.harvest.window().unwrap_err(),
        Error::Config(_)
    ));
}

use newswatch_core::{ConfigError, Extractor, NewsRecord, WatchConfig};
use url::Url;

fn base() -> Url {
    Url::parse("https://www.ssju.ac.in/news-events").unwrap()
}

fn sample_page() -> &'static str {
    r#"<!DOCTYPE html>
<html>
  <body>
    <nav>
      <a href="/">Home</a>
      <a href="/news-events">News &amp; Events</a>
      <a href="mailto:info@ssju.ac.in">Contact</a>
    </nav>
    <div class="view-content">
      <div class="views-row">
        <span class="date">12 Mar</span>
        <a href="/news/exam-notice">
          Exam
          Notice
        </a>
      </div>
      <div class="views-row"><a href="https://www.ssju.ac.in/news/convocation">Convocation 2025</a></div>
      <div class="views-row"><p>No link in this row</p></div>
      <div class="views-row"><a href="/NEWS/fees">Fee Schedule</a></div>
      <div class="views-row"><a href="/news/exam-notice">Exam Notice</a></div>
    </div>
    <footer><a href="/events/sports-day">Sports Day</a></footer>
  </body>
</html>"#
}

#[test]
fn default_rules_pick_news_links_in_page_order() {
    let extractor = Extractor::from_config(&WatchConfig::default()).unwrap();

    let records = extractor.extract(sample_page());

    let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "News & Events",
            "Exam Notice",
            "Convocation 2025",
            "Fee Schedule",
            "Exam Notice",
        ]
    );
    assert_eq!(records[1].link, "https://www.ssju.ac.in/news/exam-notice");
    assert_eq!(records[3].link, "https://www.ssju.ac.in/NEWS/fees");
}

#[test]
fn row_selector_takes_first_link_of_each_row() {
    let extractor = Extractor::new(".view-content .views-row", None, base()).unwrap();

    let records = extractor.extract(sample_page());

    assert_eq!(
        records,
        vec![
            NewsRecord {
                title: "Exam Notice".into(),
                link: "https://www.ssju.ac.in/news/exam-notice".into()
            },
            NewsRecord {
                title: "Convocation 2025".into(),
                link: "https://www.ssju.ac.in/news/convocation".into()
            },
            NewsRecord {
                title: "Fee Schedule".into(),
                link: "https://www.ssju.ac.in/NEWS/fees".into()
            },
            NewsRecord {
                title: "Exam Notice".into(),
                link: "https://www.ssju.ac.in/news/exam-notice".into()
            },
        ]
    );
}

#[test]
fn page_without_matching_structure_yields_no_records() {
    let extractor = Extractor::new(".view-content .views-row", None, base()).unwrap();
    assert!(extractor
        .extract("<html><body><p>Maintenance</p></body></html>")
        .is_empty());
    assert!(extractor.extract("").is_empty());
}

#[test]
fn link_filter_ignores_the_host_name() {
    let base = Url::parse("https://news.ssju.ac.in/").unwrap();
    let extractor = Extractor::new("a[href]", Some("/news"), base).unwrap();

    let records = extractor.extract(
        r#"<ul>
             <li><a href="/about">About</a></li>
             <li><a href="https://news.ssju.ac.in/contact">Contact</a></li>
             <li><a href="/news/42">Admit Cards Released</a></li>
           </ul>"#,
    );

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "Admit Cards Released");
    assert_eq!(records[0].link, "https://news.ssju.ac.in/news/42");
}

#[test]
fn invalid_selector_is_a_config_error() {
    let err = Extractor::new("div[[", None, base()).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidSelector { .. }));
}

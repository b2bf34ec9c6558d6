//! Renderer - popup HTML for every PopupState
//!
//! Output is an HTML fragment that replaces the popup's content wholesale.
//! Fragments are askama templates, so everything interpolated from the
//! service or the host page is escaped by the template engine.

use askama::Template;
use chrono::{DateTime, NaiveDate};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::config::OverlayConfig;
use crate::fetch::{ErrorKind, Outcome, ProfessorRecord, ReviewEntry};

/// Attribute carried by the close button; the DOM layer delegates clicks on it.
pub const CLOSE_ATTR: &str = "data-profcore-close";

const RATING_PLACEHOLDER: &str = "N/A";

/// Shown only if a template fails to render; keeps the popup closable.
const FALLBACK_HTML: &str = r#"<div class="profcore-header"><button type="button" class="profcore-close" data-profcore-close aria-label="Close">&times;</button></div>"#;

/// One decimal place, or the placeholder.
pub fn format_rating(rating: Option<f64>) -> String {
    match rating {
        Some(r) if r.is_finite() => format!("{:.1}", r),
        _ => RATING_PLACEHOLDER.to_string(),
    }
}

fn rating_class(rating: Option<f64>) -> &'static str {
    match rating {
        Some(r) if r >= 4.0 => "profcore-rating--good",
        Some(r) if r >= 3.0 => "profcore-rating--ok",
        Some(_) => "profcore-rating--poor",
        None => "profcore-rating--none",
    }
}

/// "2024-03-01" or an RFC 3339 timestamp → "Mar 1, 2024"; anything else verbatim.
pub fn format_review_date(raw: &str) -> String {
    let raw = raw.trim();
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| raw.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()));
    match date {
        Some(d) => d.format("%b %-d, %Y").to_string(),
        None => raw.to_string(),
    }
}

fn non_blank(value: Option<&str>) -> &str {
    value.map(str::trim).unwrap_or_default()
}

/// Static copy for each error kind
struct ErrorCopy {
    icon: &'static str,
    title: &'static str,
    message: &'static str,
    suggestion: &'static str,
}

fn error_copy(kind: ErrorKind) -> ErrorCopy {
    match kind {
        ErrorKind::ServerError => ErrorCopy {
            icon: "\u{26A0}",
            title: "Review service error",
            message: "The review service ran into a problem while looking up this instructor.",
            suggestion: "Try again in a few minutes.",
        },
        ErrorKind::NetworkFailure => ErrorCopy {
            icon: "\u{1F50C}",
            title: "Can't reach the review service",
            message: "The request never reached the server.",
            suggestion: "Check your connection, then hover the name again.",
        },
        ErrorKind::Timeout => ErrorCopy {
            icon: "\u{23F3}",
            title: "Request timed out",
            message: "The review service took too long to answer.",
            suggestion: "It may be waking up. Hover the name again to retry.",
        },
        ErrorKind::MalformedResponse => ErrorCopy {
            icon: "\u{1F9E9}",
            title: "Unexpected response",
            message: "The review service sent data in a format this page doesn't understand.",
            suggestion: "Try again later.",
        },
        ErrorKind::GenericError | ErrorKind::NotFound => ErrorCopy {
            icon: "\u{2757}",
            title: "Something went wrong",
            message: "The review lookup failed.",
            suggestion: "Hover the name again to retry.",
        },
    }
}

// =============================================================================
// Templates
// =============================================================================

#[derive(Template)]
#[template(
    source = r#"<div class="profcore-header"><span class="profcore-title">{{ title }}</span><button type="button" class="profcore-close" {{ close_attr }} aria-label="Close">&times;</button></div>"#,
    ext = "html"
)]
struct HeaderTemplate<'a> {
    title: &'a str,
    close_attr: &'a str,
}

#[derive(Template)]
#[template(
    source = r#"{{ header|safe }}<div class="profcore-body profcore-loading">
  <div class="profcore-spinner"></div>
  <p>Loading reviews for {{ name }}&hellip;</p>
</div>"#,
    ext = "html"
)]
struct LoadingTemplate<'a> {
    header: String,
    name: &'a str,
}

struct ReviewCard<'a> {
    rating: String,
    rating_class: &'static str,
    text: &'a str,
    course: &'a str,
    date: String,
}

impl<'a> ReviewCard<'a> {
    fn new(review: &'a ReviewEntry) -> Self {
        let date = non_blank(review.date.as_deref());
        Self {
            rating: format_rating(review.rating),
            rating_class: rating_class(review.rating),
            text: &review.text,
            course: non_blank(review.course.as_deref()),
            date: if date.is_empty() {
                String::new()
            } else {
                format_review_date(date)
            },
        }
    }
}

#[derive(Template)]
#[template(
    source = r#"{{ header|safe }}<div class="profcore-body">
  <div class="profcore-score"><span class="profcore-rating {{ rating_class }}">{{ rating|safe }}</span><span class="profcore-scale">/ 5</span></div>
  {% if !stats.is_empty() %}<ul class="profcore-stats">{% for item in stats %}<li>{{ item }}</li>{% endfor %}</ul>{% endif %}
  {% if !summary.is_empty() %}<div class="profcore-summary">
    <div class="profcore-summary-label">AI Summary</div>
    <p>{{ summary }}</p>
  </div>{% endif %}
  <div class="profcore-reviews">
  {% if reviews.is_empty() %}<p class="profcore-empty">No written reviews yet.</p>
  {% else %}<h4>Recent reviews</h4>
  {% for review in reviews %}<div class="profcore-review">
    <div class="profcore-review-meta"><span class="profcore-rating {{ review.rating_class }}">{{ review.rating|safe }}</span>{% if !review.course.is_empty() %}<span class="profcore-course">{{ review.course }}</span>{% endif %}{% if !review.date.is_empty() %}<span class="profcore-date">{{ review.date }}</span>{% endif %}</div>
    <p class="profcore-review-text">{{ review.text }}</p>
  </div>
  {% endfor %}{% if remaining > 0 %}<div class="profcore-more">+{{ remaining }} more</div>{% endif %}
  {% endif %}</div>
</div>"#,
    ext = "html"
)]
struct RecordTemplate<'a> {
    header: String,
    rating: String,
    rating_class: &'static str,
    stats: Vec<String>,
    summary: &'a str,
    reviews: Vec<ReviewCard<'a>>,
    remaining: usize,
}

#[derive(Template)]
#[template(
    source = r#"{{ header|safe }}<div class="profcore-body profcore-not-found">
  <div class="profcore-icon">&#128221;</div>
  <h4>No reviews yet</h4>
  <p>Nobody has reviewed {{ name }} yet.</p>
  <a class="profcore-cta" href="{{ link|safe }}" target="_blank" rel="noopener noreferrer">Be the first to leave a review</a>
</div>"#,
    ext = "html"
)]
struct NotFoundTemplate<'a> {
    header: String,
    name: &'a str,
    link: String,
}

#[derive(Template)]
#[template(
    source = r#"{{ header|safe }}<div class="profcore-body profcore-error profcore-error--{{ kind }}">
  <div class="profcore-icon">{{ icon }}</div>
  <h4>{{ title }}</h4>
  <p>{{ message }}</p>
  <p class="profcore-suggestion">{{ suggestion }}</p>
  {% if !detail.is_empty() %}<pre class="profcore-detail">{{ detail }}</pre>{% endif %}
</div>"#,
    ext = "html"
)]
struct ErrorTemplate<'a> {
    header: String,
    kind: &'static str,
    icon: &'static str,
    title: &'static str,
    message: &'static str,
    suggestion: &'static str,
    detail: &'a str,
}

fn render<T: Template>(template: &T) -> String {
    template.render().unwrap_or_else(|e| {
        console_error!("[Renderer] template failed: {}", e);
        FALLBACK_HTML.to_string()
    })
}

// =============================================================================
// Renderer
// =============================================================================

/// Formats popup content. Holds only the display knobs from the config.
#[derive(Debug, Clone)]
pub struct Renderer {
    max_reviews: usize,
    contribute_url: String,
}

impl Renderer {
    pub fn new(max_reviews: usize, contribute_url: &str) -> Self {
        Self {
            max_reviews,
            contribute_url: contribute_url.to_string(),
        }
    }

    pub fn from_config(config: &OverlayConfig) -> Self {
        Self::new(config.max_reviews, &config.contribute_url)
    }

    /// Title bar with the close button; embedded unescaped by the body templates.
    fn header(&self, title: &str) -> String {
        render(&HeaderTemplate {
            title,
            close_attr: CLOSE_ATTR,
        })
    }

    pub fn render_loading(&self, name: &str) -> String {
        render(&LoadingTemplate {
            header: self.header(name),
            name,
        })
    }

    /// Content for a settled lookup of `name`.
    pub fn render_outcome(&self, name: &str, outcome: &Outcome) -> String {
        match outcome {
            Outcome::Success(record) => self.render_record(record),
            Outcome::NotFound => self.render_not_found(name),
            other => match other.error_kind() {
                Some(kind) => self.render_error(name, kind, other.detail()),
                None => String::new(),
            },
        }
    }

    pub fn render_record(&self, record: &ProfessorRecord) -> String {
        let reviews: Vec<ReviewCard> = record
            .reviews
            .iter()
            .take(self.max_reviews)
            .map(ReviewCard::new)
            .collect();
        render(&RecordTemplate {
            header: self.header(&record.name),
            rating: format_rating(record.rating),
            rating_class: rating_class(record.rating),
            stats: stats_items(record),
            summary: non_blank(record.summary.as_deref()),
            reviews,
            remaining: record.reviews.len().saturating_sub(self.max_reviews),
        })
    }

    pub fn render_not_found(&self, name: &str) -> String {
        // emitted unescaped; the name is fully percent-encoded
        let link = format!(
            "{}?q={}",
            self.contribute_url.replace('"', "%22"),
            utf8_percent_encode(name.trim(), NON_ALPHANUMERIC)
        );
        render(&NotFoundTemplate {
            header: self.header(name),
            name,
            link,
        })
    }

    pub fn render_error(&self, name: &str, kind: ErrorKind, detail: Option<&str>) -> String {
        let copy = error_copy(kind);
        let detail = match kind {
            ErrorKind::GenericError | ErrorKind::MalformedResponse => detail.unwrap_or_default(),
            _ => "",
        };
        render(&ErrorTemplate {
            header: self.header(name),
            kind: kind.as_str(),
            icon: copy.icon,
            title: copy.title,
            message: copy.message,
            suggestion: copy.suggestion,
            detail,
        })
    }
}

fn stats_items(record: &ProfessorRecord) -> Vec<String> {
    let mut items = Vec::new();
    if let Some(difficulty) = record.difficulty {
        items.push(format!("Difficulty {:.1}", difficulty));
    }
    if let Some(pct) = record.would_take_again {
        items.push(format!("{:.0}% would take again", pct));
    }
    if let Some(count) = record.num_ratings {
        items.push(format!("{} rating{}", count, if count == 1 { "" } else { "s" }));
    }
    let department = non_blank(record.department.as_deref());
    if !department.is_empty() {
        items.push(department.to_string());
    }
    items
}

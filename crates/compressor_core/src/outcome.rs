use std::time::Duration;

use crate::Target;

pub const CONNECTIVITY_MESSAGE: &str =
    "Could not reach the compression server. Check your connection and try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    PartialSuccess,
    AlreadyUnderTarget,
}

/// A successful service reply, as consumed by the presenter.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeRecord {
    pub filename: String,
    pub original_mb: f64,
    pub compressed_mb: f64,
    pub ratio_percent: f64,
    pub download_id: String,
    /// Echoed by the service except for files already under target.
    pub target_mb: Option<u32>,
    pub kind: OutcomeKind,
}

/// Why a job ended in `Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobFailure {
    /// Error text reported by the service, shown verbatim.
    Service(String),
    /// No verdict within the client-side limit.
    Timeout { after: Duration },
    Connectivity,
}

impl JobFailure {
    pub fn message(&self) -> String {
        match self {
            JobFailure::Service(message) => message.clone(),
            JobFailure::Timeout { after } => format!(
                "Compression timed out after {}. Try again with the 10MB target, \
                 which compresses less aggressively and finishes faster.",
                describe_duration(*after)
            ),
            JobFailure::Connectivity => CONNECTIVITY_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRef {
    pub download_id: String,
    pub filename: String,
}

impl DownloadRef {
    /// Download location relative to the service root, filename percent-encoded.
    pub fn relative_url(&self) -> String {
        format!(
            "download/{}?filename={}",
            urlencoding::encode(&self.download_id),
            urlencoding::encode(&self.filename)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub kind: OutcomeKind,
    pub title: String,
    pub filename: String,
    pub original_size: String,
    pub compressed_size: String,
    pub ratio: String,
    pub banner: Option<String>,
    pub download: DownloadRef,
}

/// Build the result surface contents for a successful reply.
///
/// `target` is the target the job was submitted with; it fills in for a
/// reply that does not echo one.
pub fn present_success(record: &OutcomeRecord, target: Target) -> ResultView {
    let ratio = match record.kind {
        OutcomeKind::AlreadyUnderTarget => "0%".to_string(),
        _ => format!("{}%", format_number(record.ratio_percent)),
    };
    let (title, banner) = match record.kind {
        OutcomeKind::AlreadyUnderTarget => ("Already Under Target!", None),
        OutcomeKind::PartialSuccess => {
            let target_mb = record.target_mb.unwrap_or_else(|| target.megabytes());
            let banner = format!(
                "Could not reach the {}MB target. Best achieved: {}MB ({}% reduction).",
                target_mb,
                format_number(record.compressed_mb),
                format_number(record.ratio_percent)
            );
            ("Best Compression Achieved", Some(banner))
        }
        OutcomeKind::Success => ("Compression Complete!", None),
    };

    ResultView {
        kind: record.kind,
        title: title.to_string(),
        filename: record.filename.clone(),
        original_size: format!("{} MB", format_number(record.original_mb)),
        compressed_size: format!("{} MB", format_number(record.compressed_mb)),
        ratio,
        banner,
        download: DownloadRef {
            download_id: record.download_id.clone(),
            filename: record.filename.clone(),
        },
    }
}

fn describe_duration(after: Duration) -> String {
    let secs = after.as_secs();
    let (count, unit) = match secs {
        0 => return format!("{} ms", after.as_millis()),
        s if s % 60 == 0 => (s / 60, "minute"),
        s => (s, "second"),
    };
    if count == 1 {
        format!("1 {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

/// Shortest decimal form: `3.0` prints as `3`, `6.4` as `6.4`.
pub fn format_number(value: f64) -> String {
    if value.is_finite() {
        format!("{value}")
    } else {
        "0".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: OutcomeKind) -> OutcomeRecord {
        OutcomeRecord {
            filename: "report_compressed.pdf".to_string(),
            original_mb: 12.5,
            compressed_mb: 4.75,
            ratio_percent: 62.0,
            download_id: "ab12cd34".to_string(),
            target_mb: Some(5),
            kind,
        }
    }

    #[test]
    fn numbers_drop_trailing_zeroes() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(6.4), "6.4");
        assert_eq!(format_number(f64::NAN), "0");
    }

    #[test]
    fn success_has_no_banner() {
        let view = present_success(&record(OutcomeKind::Success), Target::FiveMb);
        assert_eq!(view.title, "Compression Complete!");
        assert_eq!(view.original_size, "12.5 MB");
        assert_eq!(view.compressed_size, "4.75 MB");
        assert_eq!(view.ratio, "62%");
        assert_eq!(view.banner, None);
    }

    #[test]
    fn partial_banner_falls_back_to_submitted_target() {
        let mut partial = record(OutcomeKind::PartialSuccess);
        partial.target_mb = None;
        let view = present_success(&partial, Target::TenMb);
        let banner = view.banner.expect("banner");
        assert!(banner.contains("10MB target"));
    }

    #[test]
    fn download_url_encodes_filename() {
        let reference = DownloadRef {
            download_id: "x1".to_string(),
            filename: "my report&co.pdf".to_string(),
        };
        assert_eq!(
            reference.relative_url(),
            "download/x1?filename=my%20report%26co.pdf"
        );
    }

    #[test]
    fn timeout_message_follows_configured_limit() {
        let short = JobFailure::Timeout {
            after: Duration::from_secs(90),
        };
        assert!(short.message().starts_with("Compression timed out after 90 seconds."));
        let one_minute = JobFailure::Timeout {
            after: Duration::from_secs(60),
        };
        assert!(one_minute.message().contains("after 1 minute."));
        let tiny = JobFailure::Timeout {
            after: Duration::from_millis(250),
        };
        assert!(tiny.message().contains("after 250 ms."));
    }

    #[test]
    fn failure_messages() {
        assert_eq!(JobFailure::Service("boom".into()).message(), "boom");
        let default_limit = JobFailure::Timeout {
            after: Duration::from_millis(600_000),
        };
        assert!(default_limit.message().contains("after 10 minutes"));
        assert!(default_limit.message().contains("10MB target"));
        assert_eq!(JobFailure::Connectivity.message(), CONNECTIVITY_MESSAGE);
    }
}

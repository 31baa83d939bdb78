use crate::i18n::Language;
use crate::page::{PageSnapshot, Phase, ServerStatus};
use std::fmt::{self, Write};

const SCRIPT: &str = r#"
async function call(method, url, body, headers) {
  await fetch(url, { method, body, headers: headers || {} });
  location.reload();
}
function sendFile(file) {
  if (!file) return;
  call('PUT', '/api/image?name=' + encodeURIComponent(file.name), file, { 'Content-Type': file.type || 'application/octet-stream' });
}
function drag(active) {
  fetch('/api/drag', { method: 'PUT', body: JSON.stringify({ active }), headers: { 'Content-Type': 'application/json' } });
}
const zone = document.getElementById('drop-zone');
if (zone) {
  zone.addEventListener('dragenter', () => drag(true));
  zone.addEventListener('dragover', e => { e.preventDefault(); zone.classList.add('drag-over'); });
  zone.addEventListener('dragleave', e => { e.preventDefault(); zone.classList.remove('drag-over'); drag(false); });
  zone.addEventListener('drop', e => { e.preventDefault(); zone.classList.remove('drag-over'); sendFile(e.dataTransfer.files[0]); });
}
const picker = document.getElementById('file-picker');
if (picker) picker.addEventListener('change', e => sendFile(e.target.files[0]));
document.querySelectorAll('[data-action]').forEach(el => el.addEventListener('click', () => {
  const [method, url] = el.dataset.action.split(' ');
  call(method, url);
}));
document.querySelectorAll('[data-lang]').forEach(el => el.addEventListener('click', () =>
  call('PUT', '/api/language', JSON.stringify({ language: el.dataset.lang }), { 'Content-Type': 'application/json' })));
"#;

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Renders the whole page for `snapshot`.
pub fn render_page(snapshot: &PageSnapshot) -> Result<String, fmt::Error> {
    let mut html = String::new();
    write_page(&mut html, snapshot)?;
    Ok(html)
}

fn write_page(html: &mut String, snapshot: &PageSnapshot) -> fmt::Result {
    let language = snapshot.language;
    let t = language.translations();

    write!(
        html,
        "<!doctype html><html lang=\"{}\"><head><meta charset=\"utf-8\"><title>{}</title></head><body>",
        language.as_str(),
        escape_html(t.title)
    )?;

    html.push_str("<header><nav>");
    for option in Language::ALL {
        write!(
            html,
            "<button data-lang=\"{}\"{}>{}</button>",
            option.as_str(),
            if option == language { " aria-current=\"true\"" } else { "" },
            option.display_name()
        )?;
    }
    html.push_str("</nav>");
    render_server_status(html, snapshot)?;
    html.push_str("</header><main>");

    write!(
        html,
        "<h1>{}</h1><p>{}</p>",
        escape_html(t.title),
        escape_html(t.subtitle)
    )?;

    render_upload(html, snapshot)?;

    if snapshot.phase == Phase::Analyzing {
        write!(html, "<p class=\"analyzing\">{}</p>", escape_html(t.analyzing))?;
    }

    if let Some(error) = &snapshot.error {
        write!(
            html,
            "<section class=\"error\" role=\"alert\"><h2>{}</h2><p>{}</p><button data-action=\"POST /api/server-status\">{}</button></section>",
            escape_html(t.analysis_failed),
            escape_html(&error.message),
            escape_html(t.retry_connection)
        )?;
    }

    if let Some(result) = &snapshot.result {
        write!(
            html,
            "<section class=\"result {}\"><h2>{}</h2><p class=\"headline\">{}</p>",
            result.label.as_str(),
            escape_html(result.heading),
            escape_html(result.headline)
        )?;
        if let Some(confidence) = &result.confidence {
            write!(html, "<p class=\"confidence\">{}</p>", escape_html(confidence))?;
        }
        write!(html, "<p>{}</p>", escape_html(result.guidance))?;
        if let Some(recommendation) = result.recommendation {
            write!(
                html,
                "<p class=\"recommendation\">{}</p>",
                escape_html(recommendation)
            )?;
        }
        write!(
            html,
            "<button data-action=\"POST /api/reset\">{}</button></section>",
            escape_html(result.reset_action)
        )?;
    }

    render_information(html, language)?;

    write!(
        html,
        "</main><footer><h2>{}</h2><p>{}</p></footer><script>{}</script></body></html>",
        escape_html(t.disclaimer),
        escape_html(t.disclaimer_text),
        SCRIPT
    )
}

fn render_server_status(html: &mut String, snapshot: &PageSnapshot) -> fmt::Result {
    let t = snapshot.language.translations();
    let (class, text) = match snapshot.server_status {
        ServerStatus::Checking => ("checking", t.server_checking),
        ServerStatus::Online => ("online", t.server_online),
        ServerStatus::Offline => ("offline", t.server_offline),
    };
    write!(
        html,
        "<div class=\"server-status {}\">{}",
        class,
        escape_html(text)
    )?;
    if snapshot.server_status != ServerStatus::Online {
        write!(
            html,
            " <button data-action=\"POST /api/server-status\">{}</button>",
            escape_html(t.retry_connection)
        )?;
    }
    html.push_str("</div>");
    Ok(())
}

fn render_upload(html: &mut String, snapshot: &PageSnapshot) -> fmt::Result {
    let t = snapshot.language.translations();

    match (&snapshot.image, &snapshot.preview) {
        (Some(image), Some(preview)) => {
            let name = image.file_name.as_deref().unwrap_or("");
            write!(
                html,
                "<section class=\"upload\"><img alt=\"{}\" src=\"{}\"><p>{} ({} KB)</p><button data-action=\"DELETE /api/image\">{}</button>",
                escape_html(name),
                escape_html(preview),
                escape_html(name),
                image.size / 1024,
                escape_html(t.clear_image)
            )?;
            if snapshot.result.is_none() {
                write!(
                    html,
                    "<button data-action=\"POST /api/analyze\"{}>{}</button>",
                    if snapshot.can_analyze { "" } else { " disabled" },
                    escape_html(t.predict)
                )?;
            }
            html.push_str("</section>");
        }
        _ => {
            write!(
                html,
                "<section class=\"upload\"><div id=\"drop-zone\" class=\"drop-zone{}\"><p>{}</p><p class=\"upload-limit\">image/* &le; {}</p><input id=\"file-picker\" type=\"file\" accept=\"image/*\"></div>",
                if snapshot.drag_over { " drag-over" } else { "" },
                escape_html(t.upload_text),
                format_size(snapshot.max_upload_bytes)
            )?;
            html.push_str("</section>");
        }
    }

    if let Some(message) = &snapshot.intake_error {
        write!(
            html,
            "<p class=\"intake-error\" role=\"alert\">{}</p>",
            escape_html(message)
        )?;
    }
    Ok(())
}

/// Whole mebibytes print as `10 MB`, anything smaller as kilobytes.
fn format_size(bytes: usize) -> String {
    const MB: usize = 1024 * 1024;
    if bytes >= MB && bytes % MB == 0 {
        format!("{} MB", bytes / MB)
    } else {
        format!("{} KB", bytes.div_ceil(1024))
    }
}

fn render_information(html: &mut String, language: Language) -> fmt::Result {
    let t = language.translations();
    let sections: [(&str, &[&str]); 4] = [
        (t.how_it_works, &[t.step1, t.step1_desc, t.step2, t.step2_desc, t.step3, t.step3_desc]),
        (t.kidney_facts, &[t.fact1, t.fact2, t.fact3]),
        (t.symptoms, &[t.symptom1, t.symptom2, t.symptom3, t.symptom4]),
        (t.prevention, &[t.tip1, t.tip2, t.tip3, t.tip4]),
    ];

    write!(
        html,
        "<section class=\"about\"><h2>{}</h2><p>{}</p></section>",
        escape_html(t.about),
        escape_html(t.about_text)
    )?;
    for (title, items) in sections {
        write!(html, "<section><h2>{}</h2><ul>", escape_html(title))?;
        for item in items {
            write!(html, "<li>{}</li>", escape_html(item))?;
        }
        html.push_str("</ul></section>");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{ErrorKind, ImageSummary, UiError};
    use crate::prediction::{Label, Prediction};
    use crate::presentation::ResultView;

    fn idle(language: Language) -> PageSnapshot {
        PageSnapshot {
            phase: Phase::Idle,
            server_status: ServerStatus::Online,
            language,
            image: None,
            preview: None,
            drag_over: false,
            result: None,
            error: None,
            intake_error: None,
            max_upload_bytes: 10 * 1024 * 1024,
            can_analyze: false,
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>\"Tom\" & 'Jerry'</b>"),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_idle_page_shows_drop_zone() {
        let html = render_page(&idle(Language::Fr)).unwrap();

        assert!(html.contains("<html lang=\"fr\">"));
        assert!(html.contains("id=\"drop-zone\""));
        assert!(html.contains("Classificateur de Maladie Rénale"));
        assert!(!html.contains("/api/analyze"));
        assert!(html.contains("image/* &le; 10 MB"));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(10 * 1024 * 1024), "10 MB");
        assert_eq!(format_size(1024), "1 KB");
        assert_eq!(format_size(1500), "2 KB");
    }

    #[test]
    fn test_checking_status_offers_retry() {
        let mut snapshot = idle(Language::En);
        snapshot.server_status = ServerStatus::Checking;

        let html = render_page(&snapshot).unwrap();

        assert!(html.contains("server-status checking"));
        assert!(html.contains("data-action=\"POST /api/server-status\""));
    }

    #[test]
    fn test_offline_disables_analysis_and_offers_retry() {
        let mut snapshot = idle(Language::En);
        snapshot.phase = Phase::ImageSelected;
        snapshot.server_status = ServerStatus::Offline;
        snapshot.image = Some(ImageSummary {
            mime_type: "image/png".into(),
            size: 2048,
            file_name: Some("scan.png".into()),
        });
        snapshot.preview = Some("data:image/png;base64,AAAA".into());

        let html = render_page(&snapshot).unwrap();

        assert!(html.contains("Server offline"));
        assert!(html.contains("data-action=\"POST /api/analyze\" disabled"));
        assert!(html.contains("Retry connection"));
        assert!(html.contains("scan.png (2 KB)"));
    }

    #[test]
    fn test_error_message_is_escaped() {
        let mut snapshot = idle(Language::En);
        snapshot.phase = Phase::ErrorShown;
        snapshot.error = Some(UiError {
            kind: ErrorKind::RequestFailed,
            message: "HTTP 500: <script>alert(1)</script>".into(),
            status: Some(500),
        });

        let html = render_page(&snapshot).unwrap();

        assert!(html.contains("HTTP 500: &lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn test_tumor_result_card() {
        let mut snapshot = idle(Language::En);
        snapshot.phase = Phase::ResultShown;
        snapshot.result = Some(ResultView::new(
            &Prediction {
                label: Label::Tumor,
                confidence: Some(0.77),
            },
            Language::En,
        ));

        let html = render_page(&snapshot).unwrap();

        assert!(html.contains("class=\"result tumor\""));
        assert!(html.contains("77.0% confidence"));
        assert!(html.contains("class=\"recommendation\""));
        assert!(html.contains("data-action=\"POST /api/reset\""));
    }
}

//! Server-rendered HTML pages.
//!
//! Chart widgets become `<canvas data-chart="...">` elements carrying their
//! Chart.js config; a small inline script instantiates them in the browser.

use std::fmt::Write as _;

use url::Url;

use crate::models::{SectionKey, VisualResponse};
use crate::services::visualization_client::DocumentView;

use super::charts::Widget;
use super::module::{ChartRenderer, RenderedModule};
use super::section::{LayoutMode, RenderedSection};

const CHART_JS_CDN: &str = "https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js";

const STYLE: &str = r#"
body { margin: 0; font-family: system-ui, sans-serif; color: #111827; }
.layout { display: flex; min-height: 100vh; }
aside { width: 16rem; flex-shrink: 0; background: #F3F4F6; border-right: 1px solid #D1D5DB; padding: 1rem; }
aside a { display: block; padding: .5rem .75rem; margin-bottom: .25rem; border-radius: .25rem; color: inherit; text-decoration: none; }
aside a:hover { background: #E5E7EB; }
aside a.active { background: #DBEAFE; }
main { flex: 1; padding: 1rem 2rem; overflow: auto; }
.summary { color: #4B5563; margin-bottom: 1rem; }
.modules.featured { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; }
.modules.featured .main { grid-column: 1 / span 2; }
.modules.grid { display: grid; grid-template-columns: repeat(3, 1fr); gap: 1rem; }
.module { border: 1px solid #E5E7EB; border-radius: .5rem; padding: 1rem; }
.module h3 { margin: 0 0 .5rem; }
.commentary { font-size: .875rem; color: #374151; }
.chart { position: relative; }
.gauge, .stat { text-align: center; }
.stat-value { font-size: 2rem; font-weight: 700; }
.stat-label { font-size: 1.125rem; margin-left: .25rem; }
.muted { color: #6B7280; font-size: .875rem; }
.fallback { border: 1px solid #FECACA; background: #FEF2F2; border-radius: .375rem; padding: 1rem; }
.fallback p { color: #EF4444; font-weight: 500; margin: 0; }
.fallback pre { background: #fff; border: 1px solid #E5E7EB; padding: .5rem; font-size: .75rem; overflow: auto; }
.error { color: #DC2626; padding: 1rem; }
.centered { display: flex; flex-direction: column; align-items: center; justify-content: center; min-height: 100vh; }
"#;

const CHART_INIT_SCRIPT: &str = r#"
document.querySelectorAll("canvas[data-chart]").forEach(function (canvas) {
  new Chart(canvas, JSON.parse(canvas.dataset.chart));
});
"#;

const UPLOAD_SCRIPT: &str = r#"
const input = document.getElementById("file");
const button = document.getElementById("upload");
const status = document.getElementById("status");
input.addEventListener("change", function () { button.disabled = !input.files.length; status.textContent = ""; });
button.addEventListener("click", async function () {
  if (!input.files.length) { status.className = "error"; status.textContent = "Error: Please select a PDF file first."; return; }
  button.disabled = true;
  button.textContent = "Uploading...";
  try {
    const form = new FormData();
    form.append("file", input.files[0]);
    const res = await fetch("/api/upload", { method: "POST", body: form });
    if (!res.ok) { throw new Error(await res.text()); }
    const json = await res.json();
    const docId = json.doc_id || "";
    status.className = "";
    status.innerHTML = "";
    const msg = document.createElement("p");
    msg.textContent = "Successfully uploaded! Document ID: " + docId;
    const link = document.createElement("a");
    link.href = "/visualize/" + encodeURIComponent(docId);
    link.textContent = "View visualization";
    status.append(msg, link);
  } catch (err) {
    status.className = "error";
    status.textContent = "Error: " + err.message;
  } finally {
    button.disabled = false;
    button.textContent = "Upload PDF";
  }
});
"#;

/// Escape text for HTML element content and attribute values.
pub fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// `/visualize/<doc_id>[/<suffix>]` with the document id percent-encoded.
pub fn page_path(doc_id: &str, suffix: Option<&str>) -> String {
    let Ok(mut url) = Url::parse("http://localhost/") else {
        return "/visualize".to_string();
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push("visualize").push(doc_id);
        if let Some(suffix) = suffix {
            segments.push(suffix);
        }
    }
    url.path().to_string()
}

fn view_href(view: &DocumentView, section: SectionKey, layout: LayoutMode) -> String {
    format!(
        "{}?section={}&layout={}",
        page_path(&view.doc_id, None),
        section.id(),
        layout.id()
    )
}

fn page_shell(title: &str, head_extra: &str, body: &str, with_charts: bool) -> String {
    let mut html = String::with_capacity(body.len() + STYLE.len() + 512);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(html, "<title>{}</title>", esc(title));
    html.push_str(head_extra);
    let _ = writeln!(html, "<style>{}</style>", STYLE);
    html.push_str("</head>\n<body>\n");
    html.push_str(body);
    if with_charts {
        let _ = writeln!(html, "<script src=\"{}\"></script>", CHART_JS_CDN);
        let _ = writeln!(html, "<script>{}</script>", CHART_INIT_SCRIPT);
    }
    html.push_str("</body>\n</html>\n");
    html
}

pub fn upload_page() -> String {
    let body = format!(
        concat!(
            "<div style=\"max-width:28rem;margin:2.5rem auto;padding:1rem\">\n",
            "<h1>Upload Financial Document</h1>\n",
            "<input id=\"file\" type=\"file\" accept=\"application/pdf\" style=\"display:block;margin-bottom:1rem\">\n",
            "<button id=\"upload\" disabled>Upload PDF</button>\n",
            "<div id=\"status\"></div>\n",
            "</div>\n",
            "<script>{}</script>\n"
        ),
        UPLOAD_SCRIPT
    );
    page_shell("Upload Financial Document", "", &body, false)
}

/// Shown while another request for the same document is in flight.
/// Refreshing only re-reads the cache; it never issues a second request.
pub fn loading_page(view: &DocumentView) -> String {
    let body = "<div class=\"centered\"><h1>Loading visualization...</h1></div>\n";
    let refresh = format!(
        "<meta http-equiv=\"refresh\" content=\"2;url={}\">\n",
        esc(&view_href(view, view.selected, view.layout))
    );
    page_shell("Loading visualization", &refresh, body, false)
}

pub fn error_page(view: &DocumentView, message: &str) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<div class=\"error\">Error: {}</div>", esc(message));
    let _ = writeln!(
        body,
        "<form method=\"post\" action=\"{}\" style=\"padding:0 1rem\"><input type=\"hidden\" name=\"section\" value=\"{}\"><input type=\"hidden\" name=\"layout\" value=\"{}\"><button type=\"submit\">Retry</button></form>",
        esc(&page_path(&view.doc_id, Some("retry"))),
        view.selected.id(),
        view.layout.id()
    );
    page_shell("Visualization error", "", &body, false)
}

pub fn visualization_page(
    view: &DocumentView,
    response: &VisualResponse,
    renderer: &ChartRenderer,
) -> String {
    let section = renderer.render_section(view.selected.section(response), view.layout);

    let mut body = String::new();
    body.push_str("<div class=\"layout\">\n<aside>\n<h2>Sections</h2>\n<nav>\n");
    for key in SectionKey::ALL {
        let class = if key == view.selected { " class=\"active\"" } else { "" };
        let _ = writeln!(
            body,
            "<a href=\"{}\"{}>{}</a>",
            esc(&view_href(view, key, view.layout)),
            class,
            key.label()
        );
    }
    let _ = writeln!(
        body,
        "</nav>\n<p class=\"muted\"><a href=\"{}\">Switch to {} layout</a></p>\n</aside>",
        esc(&view_href(view, view.selected, view.layout.toggled())),
        view.layout.toggled().id()
    );

    body.push_str("<main>\n");
    let _ = writeln!(
        body,
        "<h1>Visualization for {}</h1>",
        esc(&response.company_name)
    );
    render_section_html(&mut body, &section);
    body.push_str("</main>\n</div>\n");

    page_shell(
        &format!("{} - {}", response.company_name, view.selected.label()),
        "",
        &body,
        true,
    )
}

fn render_section_html(out: &mut String, section: &RenderedSection) {
    let _ = writeln!(out, "<section id=\"{}\">", esc(&section.section_id));
    let _ = writeln!(out, "<h2>{}</h2>", esc(&section.name));
    let _ = writeln!(out, "<p class=\"summary\">{}</p>", esc(&section.summary));
    let _ = writeln!(out, "<div class=\"modules {}\">", section.layout.id());
    render_module_html(out, &section.main, "main");
    for side in &section.sides {
        render_module_html(out, side, "side");
    }
    out.push_str("</div>\n</section>\n");
}

fn render_module_html(out: &mut String, module: &RenderedModule, role: &str) {
    let _ = writeln!(
        out,
        "<div class=\"module {}\" data-module-id=\"{}\">",
        role,
        esc(&module.module_id)
    );
    if let Some(title) = &module.title {
        let _ = writeln!(out, "<h3>{}</h3>", esc(title));
    }
    if let Some(commentary) = &module.commentary {
        let _ = writeln!(out, "<p class=\"commentary\">{}</p>", esc(commentary));
    }
    render_widget_html(out, &module.widget);
    out.push_str("</div>\n");
}

fn chart_canvas(out: &mut String, height_px: u32, config: &impl serde::Serialize) {
    let json = serde_json::to_string(config).unwrap_or_else(|_| "{}".to_string());
    let _ = writeln!(
        out,
        "<div class=\"chart\" style=\"height:{}px\"><canvas data-chart=\"{}\"></canvas></div>",
        height_px,
        esc(&json)
    );
}

fn render_widget_html(out: &mut String, widget: &Widget) {
    match widget {
        Widget::Text => {}
        Widget::Chart(chart) => {
            chart_canvas(out, chart.height_px, &chart.config);
            if let Some(footer) = &chart.footer {
                let _ = writeln!(out, "<p class=\"muted\">{}</p>", esc(footer));
            }
        }
        Widget::Gauge(gauge) => {
            out.push_str("<div class=\"gauge\">\n");
            chart_canvas(out, gauge.height_px, &gauge.config);
            let _ = writeln!(
                out,
                "<div class=\"stat-value\" style=\"color:{}\">{}</div>",
                gauge.band.color(),
                esc(&gauge.value_text)
            );
            let _ = writeln!(out, "<div class=\"muted\">{}</div>", esc(&gauge.range_text));
            out.push_str("</div>\n");
        }
        Widget::Stat(stat) => {
            out.push_str("<div class=\"stat\">\n");
            let _ = write!(
                out,
                "<div class=\"stat-value\" style=\"color:{}\">{}",
                esc(&stat.color),
                esc(&stat.value_text)
            );
            if let Some(label) = &stat.value_label {
                let _ = write!(out, "<span class=\"stat-label\">{}</span>", esc(label));
            }
            out.push_str("</div>\n");
            if let Some(sublabel) = &stat.sublabel {
                let _ = writeln!(out, "<div class=\"muted\">{}</div>", esc(sublabel));
            }
            out.push_str("</div>\n");
        }
        Widget::Fallback(fallback) => {
            out.push_str("<div class=\"fallback\">\n<p>Unknown chart type</p>\n");
            let _ = writeln!(out, "<pre>{}</pre>", esc(&fallback.raw));
            out.push_str("</div>\n");
        }
    }
}

use crate::monitor::constants::{
    BACKEND_WIDTH, IN_PROGRESS, RESPONSE_WIDTH, SCROLL_LINES, SESSION_WIDTH, TIME_WIDTH, URL_WIDTH,
};
use crate::monitor::state::{Session, SessionTable};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::time::Instant;

pub fn render_table(table: &SessionTable, now: Instant) -> String {
    let mut out = String::new();

    push_row(&mut out, "Backend", "Sess", "Url", "Time", "Response");

    // BTreeMap keeps backends sorted; each group keeps retained order.
    let mut groups: BTreeMap<&str, Vec<&Session>> = BTreeMap::new();
    for session in table.sessions() {
        groups.entry(session.backend()).or_default().push(session);
    }

    for (backend, sessions) in groups {
        let mut label = backend;

        for session in sessions {
            for request in session.requests() {
                let url = request.full_url().unwrap_or_default();
                let time = format!("{:.2}", request.elapsed(now).as_secs_f64());
                let response = match request.ended() {
                    None => IN_PROGRESS,
                    Some(_) => request.status().unwrap_or_default(),
                };

                push_row(&mut out, label, session.id().as_str(), &url, &time, response);
                label = "";
            }
        }
    }

    out
}

fn push_row(out: &mut String, backend: &str, session: &str, url: &str, time: &str, response: &str) {
    let row = format!(
        "{backend:<bw$.bw$} {session:<sw$.sw$} {url:<uw$.uw$} {time:<tw$.tw$} {response:<rw$.rw$}",
        bw = BACKEND_WIDTH,
        sw = SESSION_WIDTH,
        uw = URL_WIDTH,
        tw = TIME_WIDTH,
        rw = RESPONSE_WIDTH,
    );
    out.push_str(row.trim_end());
    out.push('\n');
}

/// Scroll the previous frame out of view, then print `output`.
pub fn redraw<W: Write>(out: &mut W, output: &str) -> io::Result<()> {
    out.write_all("\n".repeat(SCROLL_LINES).as_bytes())?;
    out.write_all(output.as_bytes())?;
    out.flush()
}

//! HTML rendering of the messenger page.

use crate::constants::PAGE_TITLE;
use messenger_core::{Block, Chain};

/// Values the page echoes back next to the chain listing.
#[derive(Debug, Default)]
pub struct PageView<'a> {
    pub status: &'a str,
    pub sender: &'a str,
    pub receiver: &'a str,
}

pub fn render(chain: &Chain, view: &PageView<'_>) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str(&format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; margin: 2em; }}
table {{ border-collapse: collapse; width: 100%; }}
td, th {{ border: 1px solid #ccc; padding: 4px 8px; text-align: left; vertical-align: top; }}
code {{ font-size: 0.85em; word-break: break-all; }}
.status {{ font-weight: bold; margin: 1em 0; }}
</style>
</head>
<body>
<h1>{title}</h1>
"#,
        title = PAGE_TITLE
    ));

    if !view.status.is_empty() {
        html.push_str(&format!(
            "<p class=\"status\">{}</p>\n",
            escape(view.status)
        ));
    }

    html.push_str(&format!(
        r#"<form method="post" action="/message">
<label>Sender <input name="sender" value="{sender}"></label>
<label>Receiver <input name="receiver" value="{receiver}"></label>
<label>Message <input name="message"></label>
<button type="submit">Send</button>
</form>
<form method="post" action="/validate"><button type="submit">Validate chain</button></form>
<form method="post" action="/resolve"><button type="submit">Resolve conflicts</button></form>
<h2>Chain ({len} blocks)</h2>
<table>
<tr><th>Index</th><th>Timestamp</th><th>Transactions</th><th>Hash</th><th>Previous hash</th></tr>
"#,
        sender = escape(view.sender),
        receiver = escape(view.receiver),
        len = chain.len()
    ));

    for block in chain.blocks() {
        html.push_str(&block_row(block));
    }

    html.push_str("</table>\n</body>\n</html>\n");
    html
}

fn block_row(block: &Block) -> String {
    let txs: String = block
        .transactions
        .iter()
        .map(|tx| {
            format!(
                "<div>{} &rarr; {}: {}</div>",
                escape(&tx.sender),
                escape(&tx.receiver),
                escape(&tx.message)
            )
        })
        .collect();
    format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td><td><code>{}</code></td><td><code>{}</code></td></tr>\n",
        block.index,
        escape(&block.timestamp),
        txs,
        escape(&block.hash),
        escape(&block.prev_hash)
    )
}

/// Escape text for use in element content and quoted attribute values.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

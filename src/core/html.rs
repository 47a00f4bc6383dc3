//! HTML rendering of messages and reply threads.
//!
//! All user-supplied text goes through [`escape_html`]. Element ids follow
//! the page's conventions (`message-{id}`, `edit-form-{id}`, ...), and
//! buttons carry `data-action`/`data-id` for a single delegated click handler.

use std::fmt::Write;

use crate::api::Message;
use crate::core::session::{Session, viewer_owns};
use crate::core::view::{Entry, Form, Opacity};

/// Escapes the five characters that can break out of text or attribute context.
pub fn escape_html(unsafe_text: &str) -> String {
    let mut out = String::with_capacity(unsafe_text.len());
    for c in unsafe_text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders a freshly received message and all of its replies.
pub fn message_html(message: &Message, session: Option<&Session>) -> String {
    entry_html(&Entry::from_message(message.clone()), session)
}

/// Renders an entry in its current UI state.
pub fn entry_html(entry: &Entry, session: Option<&Session>) -> String {
    let mut out = String::new();
    write_entry(&mut out, entry, session, 0);
    out
}

/// Renders the whole list, top-level entries in order.
pub fn list_html(entries: &[Entry], session: Option<&Session>) -> String {
    let mut out = String::new();
    for entry in entries {
        write_entry(&mut out, entry, session, 0);
    }
    out
}

fn style_attr(shown: bool, opacity: Opacity) -> String {
    let mut rules = Vec::new();
    if !shown {
        rules.push("display: none;");
    }
    if opacity == Opacity::Transparent {
        rules.push("opacity: 0;");
    }
    if rules.is_empty() {
        String::new()
    } else {
        format!(r#" style="{}""#, rules.join(" "))
    }
}

fn form_class(base: &str, form: &Form) -> String {
    if form.active {
        format!("{base} active")
    } else {
        base.to_string()
    }
}

fn write_entry(out: &mut String, entry: &Entry, session: Option<&Session>, depth: usize) {
    let msg = &entry.message;
    let id = msg.id;
    // top level renders as `message`, anything nested as `reply`
    let kind = if depth == 0 { "message" } else { "reply" };
    let text = escape_html(&msg.text);
    let author = escape_html(&msg.username);
    let time = msg.display_time();

    let _ = write!(
        out,
        r#"<div class="{kind}" id="message-{id}"{}>"#,
        style_attr(true, entry.opacity)
    );
    let _ = write!(out, r#"<div class="{kind}-header">"#);
    let _ = write!(
        out,
        r#"<p class="{kind}-text" id="message-text-{id}"{}>{text}</p>"#,
        style_attr(entry.text_shown, entry.text_opacity)
    );

    let _ = write!(out, r#"<div class="message-actions">"#);
    let _ = write!(
        out,
        r#"<button class="reply-button" data-action="reply" data-id="{id}">Reply</button>"#
    );
    if viewer_owns(session, msg) {
        let _ = write!(
            out,
            r#"<button class="edit-button" data-action="edit" data-id="{id}">Edit</button>"#
        );
        let _ = write!(
            out,
            r#"<button class="delete-button" data-action="delete" data-id="{id}">Delete</button>"#
        );
    }
    out.push_str("</div></div>");

    let _ = write!(
        out,
        r#"<div class="{kind}-meta"><span class="message-username">{author}</span><span class="message-time">{time}</span></div>"#
    );

    let _ = write!(
        out,
        r#"<div class="{}" id="edit-form-{id}"{}>"#,
        form_class("edit-form", &entry.edit),
        style_attr(entry.edit.shown, Opacity::Opaque)
    );
    let _ = write!(
        out,
        r#"<input type="text" id="edit-input-{id}" class="edit-input" value="{}">"#,
        escape_html(&entry.edit.input)
    );
    let _ = write!(
        out,
        r#"<div class="edit-buttons"><button class="save-button" data-action="save-edit" data-id="{id}">Save</button><button class="cancel-button" data-action="cancel-edit" data-id="{id}">Cancel</button></div></div>"#
    );

    let _ = write!(
        out,
        r#"<div class="{}" id="reply-form-{id}"{}>"#,
        form_class("reply-form", &entry.reply),
        style_attr(entry.reply.shown, Opacity::Opaque)
    );
    let _ = write!(
        out,
        r#"<input type="text" id="reply-input-{id}" class="reply-input" placeholder="Write a reply..." value="{}">"#,
        escape_html(&entry.reply.input)
    );
    let _ = write!(
        out,
        r#"<div class="reply-buttons"><button class="send-reply-button" data-action="send-reply" data-id="{id}">Send</button><button class="cancel-button" data-action="cancel-reply" data-id="{id}">Cancel</button></div></div>"#
    );

    if let Some(replies) = &entry.replies {
        let _ = write!(out, r#"<div class="replies" id="replies-{id}">"#);
        for reply in replies {
            write_entry(out, reply, session, depth + 1);
        }
        out.push_str("</div>");
    }

    out.push_str("</div>");
}

//! # View Model
//!
//! Everything the user can see, as plain data. Front ends draw it; the
//! controller mutates it. Nothing here performs I/O.
//!
//! ```text
//! BoardView
//! ├── screen: Screen               // Auth or Content
//! ├── auth_form: AuthForm          // which auth form is visible
//! ├── session: Option<Session>     // who is logged in
//! ├── composer: String             // main message input
//! ├── entries: Vec<Entry>          // rendered messages, newest first
//! │   └── Entry
//! │       ├── message              // server copy (replies moved out)
//! │       ├── opacity              // fade in / fade out
//! │       ├── text_shown, text_opacity
//! │       ├── edit: Form           // edit-form-{id}
//! │       ├── reply: Form          // reply-form-{id}
//! │       └── replies: Option<Vec<Entry>>   // replies-{id}, None until first reply
//! ├── focus: Focus                 // where Enter goes
//! ├── status: String               // status line text
//! └── timeline: Timeline<Step>     // pending timed steps
//! ```
//!
//! Timed choreography goes through [`Timeline`]: an operation changes what
//! should change immediately and schedules the rest as [`Step`]s, which
//! [`BoardView::advance`] applies once due.

use std::time::Instant;

use crate::api::Message;
use crate::core::html;
use crate::core::session::Session;
use crate::core::transition::{FADE, FADE_IN_DELAY, Timeline};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Auth,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthForm {
    #[default]
    Login,
    Register,
}

/// Which input owns the Enter key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Composer,
    Reply(i64),
    Edit(i64),
    /// Browsing the list; Enter does nothing.
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opacity {
    Transparent,
    Opaque,
}

/// A show/hide input form attached to an entry.
///
/// `shown` is `display`, `active` is the CSS class that drives its fade.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    pub shown: bool,
    pub active: bool,
    pub input: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub message: Message,
    pub opacity: Opacity,
    pub text_shown: bool,
    pub text_opacity: Opacity,
    pub edit: Form,
    pub reply: Form,
    pub replies: Option<Vec<Entry>>,
}

impl Entry {
    /// Builds the entry tree for a server message. Replies nest to any depth.
    pub fn from_message(mut message: Message) -> Self {
        let replies = std::mem::take(&mut message.replies);
        let replies =
            (!replies.is_empty()).then(|| replies.into_iter().map(Entry::from_message).collect());
        let input = message.text.clone();
        Self {
            message,
            opacity: Opacity::Opaque,
            text_shown: true,
            text_opacity: Opacity::Opaque,
            edit: Form {
                input,
                ..Form::default()
            },
            reply: Form::default(),
            replies,
        }
    }

    pub fn id(&self) -> i64 {
        self.message.id
    }

    pub fn replies(&self) -> &[Entry] {
        self.replies.as_deref().unwrap_or_default()
    }

    /// True if this entry or any descendant has an edit or reply form open.
    pub fn has_open_form(&self) -> bool {
        self.edit.shown
            || self.reply.shown
            || !self.text_shown
            || self.replies().iter().any(Entry::has_open_form)
    }
}

/// A deferred view change. Steps naming an entry that no longer exists are ignored.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Raise a freshly inserted entry to full opacity.
    FadeIn(i64),
    /// Drop a faded-out entry.
    Remove(i64),
    /// Swap the faded text for the edit form.
    ShowEditForm(i64),
    /// Swap the edit form back for the text.
    CloseEditForm(i64),
    /// Close the edit form and show the saved text, still transparent.
    CommitEdit { id: i64, text: String },
    /// Raise the message text to full opacity.
    TextFadeIn(i64),
    /// Hide the reply form and clear its input.
    HideReplyForm(i64),
}

pub struct BoardView {
    pub screen: Screen,
    pub auth_form: AuthForm,
    pub session: Option<Session>,
    pub composer: String,
    pub entries: Vec<Entry>,
    pub focus: Focus,
    pub status: String,
    timeline: Timeline<Step>,
}

impl Default for BoardView {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardView {
    pub fn new() -> Self {
        Self {
            screen: Screen::Auth,
            auth_form: AuthForm::Login,
            session: None,
            composer: String::new(),
            entries: Vec::new(),
            focus: Focus::Composer,
            status: String::new(),
            timeline: Timeline::new(),
        }
    }

    // ------------------------------------------------------------------
    // Screens
    // ------------------------------------------------------------------

    pub fn show_session(&mut self, session: Session) {
        self.status = format!("Logged in as {}", session.username);
        self.session = Some(session);
        self.screen = Screen::Content;
        self.focus = Focus::Composer;
    }

    /// The logged-out view: auth screen, no session, no list.
    pub fn show_logged_out(&mut self) {
        self.session = None;
        self.screen = Screen::Auth;
        self.entries.clear();
        self.timeline.clear();
        self.focus = Focus::Composer;
        self.status.clear();
    }

    pub fn show_auth_form(&mut self, form: AuthForm) {
        self.auth_form = form;
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    // ------------------------------------------------------------------
    // List contents
    // ------------------------------------------------------------------

    /// Clears the list and rebuilds it from the server's ordered sequence.
    pub fn replace_messages(&mut self, messages: Vec<Message>) {
        self.entries = messages.into_iter().map(Entry::from_message).collect();
        self.timeline.clear();
        if matches!(self.focus, Focus::Reply(_) | Focus::Edit(_)) {
            self.focus = Focus::Composer;
        }
    }

    /// Inserts a new top-level message at the head, transparent, and fades it in.
    pub fn prepend(&mut self, message: Message, now: Instant) {
        let id = message.id;
        let mut entry = Entry::from_message(message);
        entry.opacity = Opacity::Transparent;
        self.entries.insert(0, entry);
        self.timeline.schedule(now, FADE_IN_DELAY, Step::FadeIn(id));
    }

    /// Appends a reply under `parent_id`, creating the replies container on
    /// first use. Returns false when the parent is not on screen.
    pub fn append_reply(&mut self, parent_id: i64, message: Message, now: Instant) -> bool {
        let id = message.id;
        let Some(parent) = self.find_mut(parent_id) else {
            return false;
        };
        let mut entry = Entry::from_message(message);
        entry.opacity = Opacity::Transparent;
        parent.replies.get_or_insert_with(Vec::new).push(entry);
        self.timeline.schedule(now, FADE_IN_DELAY, Step::FadeIn(id));
        true
    }

    /// Fades the entry out and removes it once the fade has run.
    pub fn fade_out_and_remove(&mut self, id: i64, now: Instant) -> bool {
        let Some(entry) = self.find_mut(id) else {
            return false;
        };
        entry.opacity = Opacity::Transparent;
        self.timeline.cancel_where(|step| *step == Step::FadeIn(id));
        self.timeline.schedule(now, FADE, Step::Remove(id));
        true
    }

    pub fn find(&self, id: i64) -> Option<&Entry> {
        find_in(&self.entries, id)
    }

    pub fn find_mut(&mut self, id: i64) -> Option<&mut Entry> {
        find_in_mut(&mut self.entries, id)
    }

    /// Ids in display order, depth first. Used for list navigation.
    pub fn flattened_ids(&self) -> Vec<i64> {
        fn walk(entries: &[Entry], out: &mut Vec<i64>) {
            for entry in entries {
                out.push(entry.id());
                walk(entry.replies(), out);
            }
        }
        let mut ids = Vec::new();
        walk(&self.entries, &mut ids);
        ids
    }

    // ------------------------------------------------------------------
    // Edit / reply toggles
    // ------------------------------------------------------------------

    /// Fades the text out, prefills the edit input, and shows the form after the fade.
    pub fn begin_edit(&mut self, id: i64, now: Instant) -> bool {
        let Some(entry) = self.find_mut(id) else {
            return false;
        };
        entry.text_opacity = Opacity::Transparent;
        entry.edit.input = entry.message.text.clone();
        self.timeline.schedule(now, FADE, Step::ShowEditForm(id));
        true
    }

    pub fn cancel_edit(&mut self, id: i64, now: Instant) -> bool {
        let Some(entry) = self.find_mut(id) else {
            return false;
        };
        entry.edit.active = false;
        // Cancelled mid-fade: the form must not appear after all
        self.timeline
            .cancel_where(|step| *step == Step::ShowEditForm(id));
        self.timeline.schedule(now, FADE, Step::CloseEditForm(id));
        if self.focus == Focus::Edit(id) {
            self.focus = Focus::List;
        }
        true
    }

    /// Records the saved text and schedules the form-to-text swap.
    pub fn commit_edit(&mut self, id: i64, text: String, now: Instant) -> bool {
        let Some(entry) = self.find_mut(id) else {
            return false;
        };
        entry.edit.active = false;
        self.timeline.schedule(now, FADE, Step::CommitEdit { id, text });
        if self.focus == Focus::Edit(id) {
            self.focus = Focus::List;
        }
        true
    }

    pub fn open_reply(&mut self, id: i64) -> bool {
        let Some(entry) = self.find_mut(id) else {
            return false;
        };
        entry.reply.shown = true;
        entry.reply.active = true;
        self.focus = Focus::Reply(id);
        true
    }

    pub fn close_reply(&mut self, id: i64, now: Instant) -> bool {
        let Some(entry) = self.find_mut(id) else {
            return false;
        };
        entry.reply.active = false;
        self.timeline.schedule(now, FADE, Step::HideReplyForm(id));
        if self.focus == Focus::Reply(id) {
            self.focus = Focus::List;
        }
        true
    }

    /// True while any edit or reply UI is open or a transition is still running.
    pub fn is_busy(&self) -> bool {
        !self.timeline.is_idle() || self.entries.iter().any(Entry::has_open_form)
    }

    // ------------------------------------------------------------------
    // Time
    // ------------------------------------------------------------------

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timeline.next_deadline()
    }

    /// Applies every step due at `now`. Returns true if anything changed.
    pub fn advance(&mut self, now: Instant) -> bool {
        let steps = self.timeline.due(now);
        let changed = !steps.is_empty();
        for step in steps {
            self.apply(step, now);
        }
        changed
    }

    fn apply(&mut self, step: Step, now: Instant) {
        match step {
            Step::FadeIn(id) => {
                if let Some(entry) = self.find_mut(id) {
                    entry.opacity = Opacity::Opaque;
                }
            }
            Step::Remove(id) => {
                remove_in(&mut self.entries, id);
                // Removing a parent takes its whole subtree with it.
                if let Focus::Edit(f) | Focus::Reply(f) = self.focus
                    && self.find(f).is_none()
                {
                    self.focus = Focus::List;
                }
            }
            Step::ShowEditForm(id) => {
                if let Some(entry) = self.find_mut(id) {
                    entry.text_shown = false;
                    entry.edit.shown = true;
                    entry.edit.active = true;
                    self.focus = Focus::Edit(id);
                }
            }
            Step::CloseEditForm(id) => {
                if let Some(entry) = self.find_mut(id) {
                    entry.edit.shown = false;
                    entry.text_shown = true;
                    entry.text_opacity = Opacity::Opaque;
                }
            }
            Step::CommitEdit { id, text } => {
                if let Some(entry) = self.find_mut(id) {
                    entry.edit.shown = false;
                    entry.text_shown = true;
                    entry.message.text = text;
                    entry.text_opacity = Opacity::Transparent;
                    self.timeline.schedule(now, FADE_IN_DELAY, Step::TextFadeIn(id));
                }
            }
            Step::TextFadeIn(id) => {
                if let Some(entry) = self.find_mut(id) {
                    entry.text_opacity = Opacity::Opaque;
                }
            }
            Step::HideReplyForm(id) => {
                if let Some(entry) = self.find_mut(id) {
                    entry.reply.shown = false;
                    entry.reply.input.clear();
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// The message list as HTML, reflecting every entry's current state.
    pub fn to_html(&self) -> String {
        html::list_html(&self.entries, self.session.as_ref())
    }
}

fn find_in(entries: &[Entry], id: i64) -> Option<&Entry> {
    entries.iter().find_map(|entry| {
        if entry.id() == id {
            Some(entry)
        } else {
            find_in(entry.replies(), id)
        }
    })
}

fn find_in_mut(entries: &mut [Entry], id: i64) -> Option<&mut Entry> {
    for entry in entries.iter_mut() {
        if entry.id() == id {
            return Some(entry);
        }
        if let Some(replies) = entry.replies.as_mut()
            && let Some(found) = find_in_mut(replies, id)
        {
            return Some(found);
        }
    }
    None
}

fn remove_in(entries: &mut Vec<Entry>, id: i64) -> bool {
    if let Some(pos) = entries.iter().position(|e| e.id() == id) {
        entries.remove(pos);
        return true;
    }
    entries
        .iter_mut()
        .filter_map(|e| e.replies.as_mut())
        .any(|replies| remove_in(replies, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{message, with_replies};
    use std::time::Duration;

    fn view_with(messages: Vec<Message>) -> BoardView {
        let mut view = BoardView::new();
        view.show_session(Session { user_id: 1, username: "bob".to_string() });
        view.replace_messages(messages);
        view
    }

    #[test]
    fn test_new_view_is_logged_out() {
        let view = BoardView::new();
        assert_eq!(view.screen, Screen::Auth);
        assert_eq!(view.auth_form, AuthForm::Login);
        assert!(!view.is_logged_in());
    }

    #[test]
    fn test_entry_tree_keeps_nested_replies() {
        let tree = with_replies(
            message(1, 1, "root"),
            vec![with_replies(message(2, 2, "child"), vec![message(3, 1, "grandchild")])],
        );
        let view = view_with(vec![tree]);
        assert_eq!(view.flattened_ids(), vec![1, 2, 3]);
        assert_eq!(view.find(3).unwrap().message.text, "grandchild");
        assert!(view.find(1).unwrap().message.replies.is_empty());
    }

    #[test]
    fn test_prepend_fades_in() {
        let t0 = Instant::now();
        let mut view = view_with(vec![message(1, 1, "old")]);
        view.prepend(message(5, 1, "hi"), t0);

        assert_eq!(view.entries[0].id(), 5);
        assert_eq!(view.entries[0].opacity, Opacity::Transparent);
        view.advance(t0 + FADE_IN_DELAY);
        assert_eq!(view.entries[0].opacity, Opacity::Opaque);
    }

    #[test]
    fn test_append_reply_creates_container() {
        let t0 = Instant::now();
        let mut view = view_with(vec![message(1, 1, "root")]);
        assert!(view.find(1).unwrap().replies.is_none());

        assert!(view.append_reply(1, message(9, 2, "re"), t0));
        assert_eq!(view.find(1).unwrap().replies().len(), 1);
        assert!(view.append_reply(1, message(10, 2, "re2"), t0));
        assert_eq!(view.find(1).unwrap().replies()[1].id(), 10);
        assert!(!view.append_reply(404, message(11, 2, "orphan"), t0));
    }

    #[test]
    fn test_fade_out_then_remove() {
        let t0 = Instant::now();
        let mut view = view_with(vec![message(1, 1, "a"), message(2, 1, "b")]);
        assert!(view.fade_out_and_remove(2, t0));
        assert_eq!(view.find(2).unwrap().opacity, Opacity::Transparent);

        view.advance(t0 + Duration::from_millis(299));
        assert!(view.find(2).is_some());
        view.advance(t0 + FADE);
        assert!(view.find(2).is_none());
        assert_eq!(view.entries.len(), 1);
    }

    #[test]
    fn test_remove_nested_reply() {
        let t0 = Instant::now();
        let mut view = view_with(vec![with_replies(message(1, 1, "a"), vec![message(2, 1, "b")])]);
        view.fade_out_and_remove(2, t0);
        view.advance(t0 + FADE);
        assert!(view.find(2).is_none());
        assert!(view.find(1).is_some());
    }

    #[test]
    fn test_edit_cycle() {
        let t0 = Instant::now();
        let mut view = view_with(vec![message(1, 1, "before")]);

        view.begin_edit(1, t0);
        let entry = view.find(1).unwrap();
        assert_eq!(entry.text_opacity, Opacity::Transparent);
        assert!(entry.text_shown);
        assert!(!entry.edit.shown);
        assert_eq!(entry.edit.input, "before");

        view.advance(t0 + FADE);
        let entry = view.find(1).unwrap();
        assert!(!entry.text_shown);
        assert!(entry.edit.shown && entry.edit.active);
        assert_eq!(view.focus, Focus::Edit(1));

        let t1 = t0 + FADE;
        view.commit_edit(1, "after".to_string(), t1);
        assert!(!view.find(1).unwrap().edit.active);
        view.advance(t1 + FADE);
        let entry = view.find(1).unwrap();
        assert!(entry.text_shown && !entry.edit.shown);
        assert_eq!(entry.message.text, "after");
        assert_eq!(entry.text_opacity, Opacity::Transparent);

        view.advance(t1 + FADE + FADE_IN_DELAY);
        assert_eq!(view.find(1).unwrap().text_opacity, Opacity::Opaque);
        assert!(!view.is_busy());
    }

    #[test]
    fn test_cancel_edit_restores_text() {
        let t0 = Instant::now();
        let mut view = view_with(vec![message(1, 1, "text")]);
        view.begin_edit(1, t0);
        view.advance(t0 + FADE);
        view.cancel_edit(1, t0 + FADE);
        view.advance(t0 + FADE * 2);

        let entry = view.find(1).unwrap();
        assert!(entry.text_shown);
        assert!(!entry.edit.shown);
        assert_eq!(entry.text_opacity, Opacity::Opaque);
        assert_eq!(entry.message.text, "text");
    }

    #[test]
    fn test_cancel_during_fade_never_shows_form() {
        let t0 = Instant::now();
        let mut view = view_with(vec![message(1, 1, "text")]);
        view.begin_edit(1, t0);
        view.cancel_edit(1, t0 + Duration::from_millis(100));

        view.advance(t0 + FADE);
        assert!(!view.find(1).unwrap().edit.shown);
        assert_ne!(view.focus, Focus::Edit(1));
        view.advance(t0 + FADE + Duration::from_millis(100));
        let entry = view.find(1).unwrap();
        assert!(entry.text_shown);
        assert_eq!(entry.text_opacity, Opacity::Opaque);
    }

    #[test]
    fn test_removing_parent_releases_focus_held_in_subtree() {
        let t0 = Instant::now();
        let mut view = view_with(vec![with_replies(
            message(1, 1, "root"),
            vec![message(2, 2, "child")],
        )]);

        view.fade_out_and_remove(1, t0);
        view.open_reply(2);
        assert_eq!(view.focus, Focus::Reply(2));

        view.advance(t0 + FADE);
        assert!(view.find(2).is_none());
        assert_eq!(view.focus, Focus::List);
    }

    #[test]
    fn test_reply_toggle() {
        let t0 = Instant::now();
        let mut view = view_with(vec![message(1, 2, "theirs")]);
        view.open_reply(1);
        assert_eq!(view.focus, Focus::Reply(1));
        assert!(view.is_busy());

        view.find_mut(1).unwrap().reply.input = "draft".to_string();
        view.close_reply(1, t0);
        assert!(view.find(1).unwrap().reply.shown);
        view.advance(t0 + FADE);

        let entry = view.find(1).unwrap();
        assert!(!entry.reply.shown);
        assert!(entry.reply.input.is_empty());
        assert_ne!(view.focus, Focus::Reply(1));
    }

    #[test]
    fn test_replace_drops_pending_steps_and_form_focus() {
        let t0 = Instant::now();
        let mut view = view_with(vec![message(1, 1, "a")]);
        view.open_reply(1);
        view.fade_out_and_remove(1, t0);

        view.replace_messages(vec![message(1, 1, "a")]);
        assert_eq!(view.focus, Focus::Composer);
        assert!(view.next_deadline().is_none());
        assert!(!view.advance(t0 + FADE));
        assert!(view.find(1).is_some());
    }

    #[test]
    fn test_logged_out_clears_everything() {
        let mut view = view_with(vec![message(1, 1, "a")]);
        view.show_logged_out();
        assert_eq!(view.screen, Screen::Auth);
        assert!(view.session.is_none());
        assert!(view.entries.is_empty());
    }
}

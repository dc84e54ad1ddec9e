// Posts view state.
// Filterable list with a detail modal, a compose/edit form, and deletion.

use std::collections::HashMap;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use tracing::debug;

use crate::api::{Comment, NewPost, Post};
use crate::tasks::{LoadOutcome, LoadRequest};

use super::input::{InputResult, SearchBox, TextInput};
use super::list::{LoadingState, Selection};
use super::page::{Effect, PageContext};
use super::query::{SortOrder, filter_indices, matches_term, sort_indices_by};
use super::request::{RequestSlot, Ticket};
use super::toast::ToastKind;

/// Author used for new posts; JSONPlaceholder accepts any user id.
const DEFAULT_USER_ID: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostSort {
    #[default]
    Id,
    TitleAsc,
    TitleDesc,
}

impl PostSort {
    pub fn next(&self) -> Self {
        match self {
            PostSort::Id => PostSort::TitleAsc,
            PostSort::TitleAsc => PostSort::TitleDesc,
            PostSort::TitleDesc => PostSort::Id,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PostSort::Id => "id",
            PostSort::TitleAsc => "title ↑",
            PostSort::TitleDesc => "title ↓",
        }
    }
}

/// An opened post and its comments.
#[derive(Debug)]
pub struct PostDetail {
    pub post: Post,
    pub comments: LoadingState<Vec<Comment>>,
    pub scroll: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Title,
    Body,
}

/// Compose form for a new post, or for replacing an existing one.
#[derive(Debug, Default)]
pub struct PostForm {
    pub title: TextInput,
    pub body: TextInput,
    pub focus: FormField,
    pub error: Option<String>,
    pub submitting: bool,
    /// Post being replaced; `None` composes a new post.
    pub editing: Option<u64>,
    user_id: Option<u64>,
}

impl PostForm {
    fn edit(post: &Post) -> Self {
        Self {
            title: TextInput::with_value(post.title.clone()),
            body: TextInput::with_value(post.body.clone()),
            editing: Some(post.id),
            user_id: Some(post.user_id),
            ..Self::default()
        }
    }

    fn draft(&self) -> NewPost {
        NewPost {
            title: self.title.value().trim().to_string(),
            body: self.body.value().trim().to_string(),
            user_id: self.user_id.unwrap_or(DEFAULT_USER_ID),
        }
    }

    fn focused_mut(&mut self) -> &mut TextInput {
        match self.focus {
            FormField::Title => &mut self.title,
            FormField::Body => &mut self.body,
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            FormField::Title => FormField::Body,
            FormField::Body => FormField::Title,
        };
    }
}

#[derive(Debug)]
pub struct PostsPage {
    pub posts: LoadingState<Vec<Post>>,
    /// Indices into the loaded posts after filtering and sorting.
    pub visible: Vec<usize>,
    pub selection: Selection,
    pub search: SearchBox,
    pub sort: PostSort,
    pub detail: Option<PostDetail>,
    pub form: Option<PostForm>,
    list_slot: RequestSlot,
    comments_slot: RequestSlot,
    submit_slot: RequestSlot,
    /// In-flight deletes by post id. Each delete settles on its own.
    deletes: HashMap<u64, Ticket>,
}

impl PostsPage {
    pub fn new(debounce: Duration) -> Self {
        Self {
            posts: LoadingState::Idle,
            visible: Vec::new(),
            selection: Selection::default(),
            search: SearchBox::new(debounce),
            sort: PostSort::default(),
            detail: None,
            form: None,
            list_slot: RequestSlot::default(),
            comments_slot: RequestSlot::default(),
            submit_slot: RequestSlot::default(),
            deletes: HashMap::new(),
        }
    }

    pub fn on_enter(&mut self, ctx: &mut PageContext) -> Vec<Effect> {
        vec![self.load(ctx)]
    }

    pub fn captures_input(&self) -> bool {
        self.search.editing || self.detail.is_some() || self.form.is_some()
    }

    /// The post under the cursor.
    pub fn selected_post(&self) -> Option<&Post> {
        let index = *self.visible.get(self.selection.selected()?)?;
        self.posts.data()?.get(index)
    }

    pub fn is_deleting(&self, id: u64) -> bool {
        self.deletes.contains_key(&id)
    }

    pub fn visible_posts(&self) -> Vec<&Post> {
        match self.posts.data() {
            Some(posts) => self.visible.iter().filter_map(|i| posts.get(*i)).collect(),
            None => Vec::new(),
        }
    }

    fn load(&mut self, ctx: &mut PageContext) -> Effect {
        self.posts = LoadingState::Loading;
        Effect::Load(self.list_slot.begin(ctx.ids), LoadRequest::Posts)
    }

    pub fn handle_key(&mut self, key: KeyEvent, ctx: &mut PageContext) -> Vec<Effect> {
        if self.form.is_some() {
            return self.handle_form_key(key, ctx);
        }
        if let Some(detail) = &mut self.detail {
            match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
                    self.detail = None;
                    self.comments_slot.cancel();
                }
                KeyCode::Up | KeyCode::Char('k') => detail.scroll = detail.scroll.saturating_sub(1),
                KeyCode::Down | KeyCode::Char('j') => detail.scroll = detail.scroll.saturating_add(1),
                _ => {}
            }
            return Vec::new();
        }
        if self.search.editing {
            self.search.handle_key(&key, ctx.now);
            return Vec::new();
        }

        let len = self.visible.len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.selection.select_prev(len),
            KeyCode::Down | KeyCode::Char('j') => self.selection.select_next(len),
            KeyCode::Char('/') => self.search.begin_editing(),
            KeyCode::Char('s') => {
                self.sort = self.sort.next();
                self.rederive();
            }
            KeyCode::Char('n') if self.posts.is_loaded() => self.form = Some(PostForm::default()),
            KeyCode::Char('e') => {
                if let Some(post) = self.selected_post() {
                    self.form = Some(PostForm::edit(post));
                }
            }
            KeyCode::Char('r') => return vec![self.load(ctx)],
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_post().map(|p| p.id) {
                    if self.deletes.contains_key(&id) {
                        return Vec::new();
                    }
                    let ticket = ctx.ids.issue();
                    self.deletes.insert(id, ticket);
                    return vec![
                        Effect::Load(ticket, LoadRequest::DeletePost(id)),
                        Effect::notify(ToastKind::Info, format!("Deleting post #{}", id)),
                    ];
                }
            }
            KeyCode::Enter => {
                if let Some(post) = self.selected_post().cloned() {
                    let id = post.id;
                    self.detail = Some(PostDetail {
                        post,
                        comments: LoadingState::Loading,
                        scroll: 0,
                    });
                    let ticket = self.comments_slot.begin(ctx.ids);
                    return vec![Effect::Load(ticket, LoadRequest::PostComments(id))];
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_form_key(&mut self, key: KeyEvent, ctx: &mut PageContext) -> Vec<Effect> {
        let Some(form) = &mut self.form else {
            return Vec::new();
        };
        if form.submitting {
            if key.code == KeyCode::Esc {
                self.form = None;
                self.submit_slot.cancel();
            }
            return Vec::new();
        }

        match key.code {
            KeyCode::Esc => self.form = None,
            KeyCode::Tab | KeyCode::BackTab => form.toggle_focus(),
            KeyCode::Enter => {
                let draft = form.draft();
                if let Err(e) = draft.validate() {
                    let message = e.to_string();
                    form.error = Some(message.clone());
                    return vec![Effect::notify(ToastKind::Warning, message)];
                }
                form.error = None;
                form.submitting = true;
                let request = match form.editing {
                    Some(id) => LoadRequest::UpdatePost(id, draft),
                    None => LoadRequest::CreatePost(draft),
                };
                let ticket = self.submit_slot.begin(ctx.ids);
                return vec![Effect::Load(ticket, request)];
            }
            _ => {
                if form.focused_mut().handle_key(&key) == InputResult::Changed {
                    form.error = None;
                }
            }
        }
        Vec::new()
    }

    pub fn tick(&mut self, ctx: &mut PageContext) -> Vec<Effect> {
        if let Some(term) = self.search.poll(ctx.now) {
            debug!(term, "filtering posts");
            self.rederive();
        }
        Vec::new()
    }

    pub fn apply(&mut self, ticket: Ticket, outcome: LoadOutcome) -> Vec<Effect> {
        match outcome {
            LoadOutcome::Posts(result) if self.list_slot.settle(ticket) => match result {
                Ok(posts) => {
                    self.posts = LoadingState::Loaded(posts);
                    self.rederive();
                    Vec::new()
                }
                Err(e) => {
                    let message = e.to_string();
                    self.posts = LoadingState::Error(message.clone());
                    self.rederive();
                    vec![Effect::error(message)]
                }
            },
            LoadOutcome::PostComments(result) if self.comments_slot.settle(ticket) => {
                let mut effects = Vec::new();
                if let Some(detail) = &mut self.detail {
                    detail.comments = match result {
                        Ok(comments) => LoadingState::Loaded(comments),
                        Err(e) => {
                            let message = e.to_string();
                            effects.push(Effect::error(format!("Comments: {}", message)));
                            LoadingState::Error(message)
                        }
                    };
                }
                effects
            }
            LoadOutcome::PostCreated(result) if self.submit_slot.settle(ticket) => match result {
                Ok(post) => {
                    self.form = None;
                    let title = post.title.clone();
                    if let Some(posts) = self.posts.data_mut() {
                        posts.insert(0, post);
                    }
                    self.rederive();
                    vec![Effect::notify(ToastKind::Success, format!("Created \"{}\"", title))]
                }
                Err(e) => {
                    let message = e.to_string();
                    if let Some(form) = &mut self.form {
                        form.submitting = false;
                        form.error = Some(message.clone());
                    }
                    vec![Effect::error(message)]
                }
            },
            LoadOutcome::PostUpdated(result) if self.submit_slot.settle(ticket) => match result {
                Ok(post) => {
                    self.form = None;
                    let message = format!("Updated post #{}", post.id);
                    if let Some(existing) = self
                        .posts
                        .data_mut()
                        .and_then(|posts| posts.iter_mut().find(|p| p.id == post.id))
                    {
                        *existing = post;
                    }
                    self.rederive();
                    vec![Effect::notify(ToastKind::Success, message)]
                }
                Err(e) => {
                    let message = e.to_string();
                    if let Some(form) = &mut self.form {
                        form.submitting = false;
                        form.error = Some(message.clone());
                    }
                    vec![Effect::error(message)]
                }
            },
            LoadOutcome::PostDeleted(id, result) if self.deletes.get(&id) == Some(&ticket) => {
                self.deletes.remove(&id);
                match result {
                    Ok(()) => {
                        if let Some(posts) = self.posts.data_mut() {
                            posts.retain(|p| p.id != id);
                        }
                        self.rederive();
                        vec![Effect::notify(ToastKind::Success, format!("Deleted post #{}", id))]
                    }
                    Err(e) => vec![Effect::error(format!("Delete failed: {}", e))],
                }
            }
            _ => {
                debug!(generation = ticket.generation, "discarding stale posts outcome");
                Vec::new()
            }
        }
    }

    /// Recompute the visible rows from the loaded posts, term, and sort.
    fn rederive(&mut self) {
        let Some(posts) = self.posts.data() else {
            self.visible.clear();
            self.selection.reset(0);
            return;
        };

        let term = self.search.term();
        let mut visible = filter_indices(posts, |p| matches_term(&p.title, term) || matches_term(&p.body, term));
        match self.sort {
            PostSort::Id => sort_indices_by(&mut visible, posts, |p| p.id, SortOrder::Ascending),
            PostSort::TitleAsc => sort_indices_by(&mut visible, posts, |p| p.title.to_lowercase(), SortOrder::Ascending),
            PostSort::TitleDesc => {
                sort_indices_by(&mut visible, posts, |p| p.title.to_lowercase(), SortOrder::Descending)
            }
        }
        self.visible = visible;
        self.selection.reset(self.visible.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PanoramaError;
    use crate::state::request::RequestIds;
    use crossterm::event::KeyModifiers;
    use std::time::Instant;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn post(id: u64, title: &str) -> Post {
        Post {
            user_id: 1,
            id,
            title: title.to_string(),
            body: format!("body of {}", title),
        }
    }

    fn ticket_of(effects: &[Effect]) -> Ticket {
        effects
            .iter()
            .find_map(|e| match e {
                Effect::Load(ticket, _) => Some(*ticket),
                _ => None,
            })
            .unwrap()
    }

    fn loaded_page(ids: &mut RequestIds, posts: Vec<Post>) -> PostsPage {
        let mut page = PostsPage::new(Duration::from_millis(300));
        let mut ctx = PageContext { ids, now: Instant::now() };
        let ticket = ticket_of(&page.on_enter(&mut ctx));
        page.apply(ticket, LoadOutcome::Posts(Ok(posts)));
        page
    }

    #[test]
    fn test_stale_list_outcome_is_dropped() {
        let mut ids = RequestIds::default();
        let mut page = PostsPage::new(Duration::from_millis(300));
        let mut ctx = PageContext { ids: &mut ids, now: Instant::now() };

        let first = ticket_of(&page.on_enter(&mut ctx));
        let second = ticket_of(&page.handle_key(key(KeyCode::Char('r')), &mut ctx));

        page.apply(first, LoadOutcome::Posts(Ok(vec![post(1, "old")])));
        assert!(page.posts.is_loading());

        page.apply(second, LoadOutcome::Posts(Ok(vec![post(2, "new")])));
        assert_eq!(page.visible_posts()[0].title, "new");
    }

    #[test]
    fn test_error_then_retry() {
        let mut ids = RequestIds::default();
        let mut page = PostsPage::new(Duration::from_millis(300));
        let mut ctx = PageContext { ids: &mut ids, now: Instant::now() };

        let ticket = ticket_of(&page.on_enter(&mut ctx));
        let effects = page.apply(
            ticket,
            LoadOutcome::Posts(Err(PanoramaError::Status {
                status: 404,
                reason: "Not Found".to_string(),
            })),
        );
        assert_eq!(page.posts.error(), Some("HTTP 404 Not Found"));
        assert!(matches!(effects[0], Effect::Notify(ToastKind::Error, _)));

        let retry = page.handle_key(key(KeyCode::Char('r')), &mut ctx);
        assert!(matches!(retry[0], Effect::Load(_, LoadRequest::Posts)));
        assert!(page.posts.is_loading());
    }

    #[test]
    fn test_debounced_filter_and_sort() {
        let mut ids = RequestIds::default();
        let mut page = loaded_page(&mut ids, vec![post(1, "Beta"), post(2, "alpha"), post(3, "Gamma")]);
        let start = Instant::now();
        let mut ctx = PageContext { ids: &mut ids, now: start };

        page.handle_key(key(KeyCode::Char('/')), &mut ctx);
        assert!(page.captures_input());
        for c in "a".chars() {
            page.handle_key(key(KeyCode::Char(c)), &mut ctx);
        }
        // Not applied until the delay elapses
        assert_eq!(page.visible.len(), 3);
        ctx.now = start + Duration::from_millis(300);
        page.tick(&mut ctx);
        assert_eq!(page.visible.len(), 3);

        page.handle_key(key(KeyCode::Char('m')), &mut ctx);
        ctx.now = start + Duration::from_millis(700);
        page.tick(&mut ctx);
        let titles: Vec<_> = page.visible_posts().iter().map(|p| p.title.clone()).collect();
        assert_eq!(titles, vec!["Gamma"]);

        page.handle_key(key(KeyCode::Esc), &mut ctx);
        page.search.clear();
        page.rederive();
        page.handle_key(key(KeyCode::Char('s')), &mut ctx);
        let titles: Vec<_> = page.visible_posts().iter().map(|p| p.title.clone()).collect();
        assert_eq!(titles, vec!["alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn test_compose_validates_before_submitting() {
        let mut ids = RequestIds::default();
        let mut page = loaded_page(&mut ids, vec![post(1, "one")]);
        let mut ctx = PageContext { ids: &mut ids, now: Instant::now() };

        page.handle_key(key(KeyCode::Char('n')), &mut ctx);
        let effects = page.handle_key(key(KeyCode::Enter), &mut ctx);
        assert!(matches!(effects[0], Effect::Notify(ToastKind::Warning, _)));
        assert_eq!(page.form.as_ref().unwrap().error.as_deref(), Some("Title is required"));

        page.handle_key(key(KeyCode::Char('T')), &mut ctx);
        page.handle_key(key(KeyCode::Tab), &mut ctx);
        page.handle_key(key(KeyCode::Char('B')), &mut ctx);
        let effects = page.handle_key(key(KeyCode::Enter), &mut ctx);
        let ticket = ticket_of(&effects);
        assert!(page.form.as_ref().unwrap().submitting);

        let effects = page.apply(ticket, LoadOutcome::PostCreated(Ok(post(101, "T"))));
        assert!(page.form.is_none());
        assert!(matches!(effects[0], Effect::Notify(ToastKind::Success, _)));
        assert_eq!(page.posts.data().unwrap().len(), 2);
    }

    #[test]
    fn test_detail_comments_ignored_after_close() {
        let mut ids = RequestIds::default();
        let mut page = loaded_page(&mut ids, vec![post(1, "one")]);
        let mut ctx = PageContext { ids: &mut ids, now: Instant::now() };

        let ticket = ticket_of(&page.handle_key(key(KeyCode::Enter), &mut ctx));
        assert_eq!(page.detail.as_ref().unwrap().post.id, 1);

        page.handle_key(key(KeyCode::Esc), &mut ctx);
        assert!(page.detail.is_none());
        assert!(page.apply(ticket, LoadOutcome::PostComments(Ok(Vec::new()))).is_empty());
    }

    #[test]
    fn test_delete_removes_post() {
        let mut ids = RequestIds::default();
        let mut page = loaded_page(&mut ids, vec![post(1, "one"), post(2, "two")]);
        let mut ctx = PageContext { ids: &mut ids, now: Instant::now() };

        let ticket = ticket_of(&page.handle_key(key(KeyCode::Char('d')), &mut ctx));
        page.apply(ticket, LoadOutcome::PostDeleted(1, Ok(())));
        assert_eq!(page.visible_posts().len(), 1);
        assert_eq!(page.selected_post().map(|p| p.id), Some(2));
    }

    #[test]
    fn test_overlapping_deletes_each_settle() {
        let mut ids = RequestIds::default();
        let mut page = loaded_page(&mut ids, vec![post(1, "one"), post(2, "two"), post(3, "three")]);
        let mut ctx = PageContext { ids: &mut ids, now: Instant::now() };

        let first = ticket_of(&page.handle_key(key(KeyCode::Char('d')), &mut ctx));
        // A second press on the same row does not start another delete
        assert!(page.handle_key(key(KeyCode::Char('d')), &mut ctx).is_empty());
        page.handle_key(key(KeyCode::Down), &mut ctx);
        let second = ticket_of(&page.handle_key(key(KeyCode::Char('d')), &mut ctx));
        assert!(page.is_deleting(1) && page.is_deleting(2));

        let effects = page.apply(first, LoadOutcome::PostDeleted(1, Ok(())));
        assert!(matches!(effects[0], Effect::Notify(ToastKind::Success, _)));
        let effects = page.apply(second, LoadOutcome::PostDeleted(2, Ok(())));
        assert!(matches!(effects[0], Effect::Notify(ToastKind::Success, _)));

        let remaining: Vec<_> = page.visible_posts().iter().map(|p| p.id).collect();
        assert_eq!(remaining, vec![3]);
        assert!(!page.is_deleting(1) && !page.is_deleting(2));
    }

    #[test]
    fn test_edit_replaces_post_in_place() {
        let mut ids = RequestIds::default();
        let mut page = loaded_page(&mut ids, vec![post(1, "one"), post(2, "two")]);
        let mut ctx = PageContext { ids: &mut ids, now: Instant::now() };

        page.handle_key(key(KeyCode::Down), &mut ctx);
        page.handle_key(key(KeyCode::Char('e')), &mut ctx);
        let form = page.form.as_ref().unwrap();
        assert_eq!(form.editing, Some(2));
        assert_eq!(form.title.value(), "two");

        page.handle_key(key(KeyCode::Char('!')), &mut ctx);
        let effects = page.handle_key(key(KeyCode::Enter), &mut ctx);
        let ticket = match &effects[0] {
            Effect::Load(ticket, LoadRequest::UpdatePost(2, draft)) => {
                assert_eq!(draft.title, "two!");
                *ticket
            }
            other => panic!("expected update, got {:?}", other),
        };

        let effects = page.apply(ticket, LoadOutcome::PostUpdated(Ok(post(2, "two!"))));
        assert!(page.form.is_none());
        assert!(matches!(effects[0], Effect::Notify(ToastKind::Success, _)));
        let titles: Vec<_> = page.visible_posts().iter().map(|p| p.title.clone()).collect();
        assert_eq!(titles, vec!["one", "two!"]);
    }
}

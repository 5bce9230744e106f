use std::cell::RefCell;
use std::rc::Rc;
use itertools::Itertools;
use leptos::prelude::*;
use leptos::reactive::owner::Owner;
use leptos::tachys::view::RenderHtml;
use log::debug;
use tokio::task::JoinHandle;
use crate::load::{load_users, LoadOutcome, OutcomeKind, UserSource};
use crate::user::UserCollection;
use crate::{UsersClient, ViewConfig};

pub const HEADING: &str = "Lista de Usuários";

/// Where a [`UserListView`] is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// [`UserListView::mount()`] has not been called yet
    Unmounted,
    /// The fetch is in flight
    Pending,
    /// The fetch completed, this is how
    Finished(OutcomeKind),
}

#[derive(Debug)]
struct ViewState {
    users: UserCollection,
    status: LoadStatus,
}

impl ViewState {

    fn apply(&mut self, outcome: LoadOutcome) {
        self.status = LoadStatus::Finished(outcome.kind());
        // Replaced as a whole, never merged
        self.users = outcome.into_users();
    }

}

/// Shows the list of users read from a [`UserSource`]. \
///
/// The list is fetched exactly once, when the view is first displayed via [`UserListView::mount()`].
/// Until that fetch completes, and forever if it fails, the list is simply empty.
///
/// Must be used from within a [`tokio::task::LocalSet`], the fetch runs as a local task:
/// ```no_run
/// use user_list_view::{UserListView, ViewConfig};
///
/// # fn main() -> anyhow::Result<()> {
/// let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
/// let local = tokio::task::LocalSet::new();
/// local.block_on(&runtime, async {
///     let mut view = UserListView::connect(&ViewConfig::default())?;
///     if let Some(fetch) = view.mount() {
///         let _ = fetch.await;
///     }
///     println!("{}", view.render().to_text());
///     anyhow::Ok(())
/// })
/// # }
/// ```
#[derive(Debug)]
pub struct UserListView<S> {
    source: Rc<S>,
    state: Rc<RefCell<ViewState>>,
}

impl UserListView<UsersClient> {

    /// Creates a view that fetches from the endpoint in `config`
    pub fn connect(config: &ViewConfig) -> anyhow::Result<Self> {
        Ok(Self::new(UsersClient::new(config)?))
    }

}

impl<S: UserSource + 'static> UserListView<S> {

    pub fn new(source: S) -> Self {
        Self {
            source: Rc::new(source),
            state: Rc::new(RefCell::new(ViewState {
                users: vec![],
                status: LoadStatus::Unmounted,
            })),
        }
    }

    /// Lifecycle hook for the first display of the view. Starts the one and only fetch and returns right away. \
    /// Returns the handle of the fetch task, or `None` if the view was already mounted, in which case nothing happens.
    ///
    /// Dropping the handle does not cancel the fetch. If the view is dropped before the fetch completes,
    /// the result is discarded.
    ///
    /// # Panics
    /// If called outside of a [`tokio::task::LocalSet`]
    pub fn mount(&mut self) -> Option<JoinHandle<()>> {
        {
            let mut state = self.state.borrow_mut();
            if state.status != LoadStatus::Unmounted {
                return None;
            }
            state.status = LoadStatus::Pending;
        }
        let source = self.source.clone();
        let state = Rc::downgrade(&self.state);
        Some(tokio::task::spawn_local(async move {
            let outcome = load_users(&*source).await;
            let Some(state) = state.upgrade() else {
                debug!("User list view is gone, ignoring {:?} outcome", outcome.kind());
                return;
            };
            state.borrow_mut().apply(outcome);
        }))
    }

}

impl<S> UserListView<S> {

    pub fn status(&self) -> LoadStatus {
        self.state.borrow().status
    }

    /// Renders the current state. Never fails, and rendering the same state twice gives the same page.
    pub fn render(&self) -> UserListPage {
        let state = self.state.borrow();
        UserListPage {
            heading: HEADING,
            entries: state.users.iter()
                .map(|user| ListEntry {
                    key: user.id.to_string(),
                    text: user.display_line(),
                })
                .collect(),
        }
    }

}

/// One line of the rendered user list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    /// The id of the user, used as reconciliation key
    pub key: String,
    /// `"{username} - {email}"`
    pub text: String,
}

/// A rendered [`UserListView`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserListPage {
    pub heading: &'static str,
    pub entries: Vec<ListEntry>,
}

impl UserListPage {

    /// The visible text of every entry, in order
    pub fn entry_texts(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.text.as_str()).collect()
    }

    /// Renders `<div><h1>heading</h1><ul><li>..</li></ul></div>` to an HTML fragment, each `li` keyed by the user id
    pub fn to_html(&self) -> String {
        let heading = self.heading;
        let entries = self.entries.clone();
        Owner::new().with(move || view! { <UserList heading=heading entries=entries /> }.to_html())
    }

    /// The heading followed by one line per entry
    pub fn to_text(&self) -> String {
        std::iter::once(self.heading)
            .chain(self.entries.iter().map(|entry| entry.text.as_str()))
            .join("\n")
    }

}

/// The markup of a [`UserListPage`]
#[component]
pub fn UserList(heading: &'static str, entries: Vec<ListEntry>) -> impl IntoView {
    view! {
        <div>
            <h1>{heading}</h1>
            <ul>
                <For
                    each=move || entries.clone()
                    key=|entry| entry.key.clone()
                    children=|entry| view! { <li data-key=entry.key>{entry.text}</li> }
                />
            </ul>
        </div>
    }
}

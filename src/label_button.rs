use leptos::prelude::*;
use leptos::reactive::owner::Owner;
use leptos::tachys::view::RenderHtml;
use log::warn;

// Makes sure the unbound link target is only reported once per process
static REPORTED_UNBOUND_TARGET: once_cell::sync::OnceCell<()> = once_cell::sync::OnceCell::new();

/// Where the link inside a [`LabelButton`] navigates to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget {
    /// No destination at all. Rendered as `href=""`, so activating the link just reloads the current page. \
    /// Nobody ever gave this link a destination and there is no prop to set one, so it is reported instead of guessed.
    Unbound,
}

/// The destination of the link nested in every [`LabelButton`]
pub const LABEL_BUTTON_TARGET: LinkTarget = LinkTarget::Unbound;

fn href_for(target: LinkTarget) -> &'static str {
    match target {
        LinkTarget::Unbound => {
            REPORTED_UNBOUND_TARGET.get_or_init(|| {
                warn!("LabelButton link has no destination, clicking it does not navigate anywhere");
            });
            ""
        }
    }
}

/// A clickable button with a text label: `<button><a href="">{content}</a></button>` \
/// `content` is a required `String` prop, leaving it out does not compile.
#[component]
pub fn LabelButton(#[prop(into)] content: String) -> impl IntoView {
    let href = href_for(LABEL_BUTTON_TARGET);
    view! {
        <button>
            <a href=href>{content}</a>
        </button>
    }
}

/// Renders a [`LabelButton`] to an HTML fragment
pub fn label_button_html(content: impl Into<String>) -> String {
    let content = content.into();
    Owner::new().with(move || view! { <LabelButton content=content /> }.to_html())
}

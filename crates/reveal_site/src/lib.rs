//! Reveal Site
//!
//! The page-level behaviour around the reveal controller: a [`Page`] binds
//! the interactive parts of a document when it is built and drives them from
//! scrolls, clicks and frame ticks.
//!
//! - **Cards**: staggered entrance of `.service-card` elements and hover growth
//! - **Filter**: `.filter-btn` buttons narrowing `.service-item` lists
//! - **Contact form**: required-field check and a simulated send
//! - **Notifications**: self-dismissing toasts
//! - **Mobile menu** and **smooth anchor scrolling**
//! - **Snapshots**: JSON page descriptions in, element state out

pub mod cards;
pub mod contact;
pub mod filter;
pub mod menu;
pub mod notify;
pub mod page;
pub mod scroll;
pub mod slots;
pub mod snapshot;

pub use cards::ServiceCards;
pub use contact::{ContactForm, FormError};
pub use filter::ServiceFilter;
pub use menu::MobileMenu;
pub use notify::{NotificationKind, Notifier};
pub use page::{ClickAction, Page, PageOptions};
pub use scroll::{SharedViewport, SmoothScroll};
pub use slots::TweenSlots;
pub use snapshot::{
    DescriptionError, ElementDescription, ElementSnapshot, PageDescription, PageSnapshot,
};

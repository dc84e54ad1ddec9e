// State management module.
// Per-view state machines plus the loading, selection, and request bookkeeping they share.

pub mod characters;
pub mod countries;
pub mod debounce;
pub mod input;
pub mod list;
pub mod page;
pub mod posts;
pub mod query;
pub mod request;
pub mod toast;
pub mod weather;

pub use characters::CharactersPage;
pub use countries::{COUNTRIES_PAGE_SIZE, CountriesPage, CountrySort};
pub use input::{InputResult, SearchBox, TextInput};
pub use list::{LoadingState, Selection};
pub use page::{Effect, Page, PageContext, PageSettings};
pub use posts::{FormField, PostDetail, PostForm, PostSort, PostsPage};
pub use request::{RequestIds, RequestSlot, Ticket};
pub use toast::{Toast, ToastKind, Toasts};
pub use weather::WeatherPage;

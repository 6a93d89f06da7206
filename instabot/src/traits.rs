//! Trait definitions with mockall annotations for testing
//!
//! These are the seams between the engine and the outside world: the browser,
//! the site built on top of it, durable state storage and the calendar.

use std::fmt;
use std::time::Duration;

use chrono::NaiveDate;

use crate::core::discovery::Candidate;
use crate::core::store::StoreDocument;
use crate::error::InstabotResult;

/// How to locate an element on the current page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Css(String),
    XPath(String),
    LinkText(String),
    PartialLinkText(String),
    /// Form control `name` attribute
    Name(String),
}

impl Locator {
    pub fn css(selector: &str) -> Self {
        Locator::Css(selector.to_string())
    }

    pub fn xpath(path: &str) -> Self {
        Locator::XPath(path.to_string())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(s) => write!(f, "css `{s}`"),
            Locator::XPath(s) => write!(f, "xpath `{s}`"),
            Locator::LinkText(s) => write!(f, "link text `{s}`"),
            Locator::PartialLinkText(s) => write!(f, "partial link text `{s}`"),
            Locator::Name(s) => write!(f, "name `{s}`"),
        }
    }
}

/// Opaque reference to an element located by a [`PageDriver`].
///
/// Text, attributes and clicks go through the driver that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle {
    pub id: String,
}

impl ElementHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Where a stable-height scroll loop operates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Whole document of a hashtag page
    TagFeed,
    /// Followers panel opened from the operator's profile
    FollowersDialog,
}

/// What a post page says about its author
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostInfo {
    pub author: String,
    /// The UI already shows the author as followed
    pub already_following: bool,
}

/// Login credentials for the operator account
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Browser capability contract.
///
/// Every call blocks until the browser answers; there is no timeout.
#[mockall::automock]
pub trait PageDriver {
    /// Load a URL in the current window
    fn navigate(&self, url: &str) -> InstabotResult<()>;

    /// Locate a required element; absence is `ElementNotFound`
    fn find_element(&self, locator: &Locator) -> InstabotResult<ElementHandle>;

    /// Locate an element that may legitimately be missing
    fn find_element_optional(&self, locator: &Locator) -> InstabotResult<Option<ElementHandle>>;

    fn find_elements(&self, locator: &Locator) -> InstabotResult<Vec<ElementHandle>>;

    /// Locate elements below `parent`
    fn find_elements_within(&self, parent: &ElementHandle, locator: &Locator) -> InstabotResult<Vec<ElementHandle>>;

    fn text(&self, element: &ElementHandle) -> InstabotResult<String>;

    fn attribute(&self, element: &ElementHandle, name: &str) -> InstabotResult<Option<String>>;

    fn click(&self, element: &ElementHandle) -> InstabotResult<()>;

    fn send_keys(&self, element: &ElementHandle, text: &str) -> InstabotResult<()>;

    /// Run synchronous JavaScript and return its JSON result
    fn run_script(&self, script: &str) -> InstabotResult<serde_json::Value>;

    /// Blocking settle delay
    fn wait_fixed(&self, delay: Duration);
}

/// Site-level operations the orchestrators need.
///
/// Implementations own every selector and URL; callers only see usernames,
/// candidates and follow states.
#[mockall::automock]
pub trait SocialSite {
    fn login(&mut self, credentials: &Credentials) -> InstabotResult<()>;

    /// Navigate to the feed of a hashtag
    fn open_tag_feed(&mut self, tag: &str) -> InstabotResult<()>;

    /// Open the operator's followers panel
    fn open_followers(&mut self) -> InstabotResult<()>;

    /// Current scrollable height of `surface`
    fn content_height(&mut self, surface: Surface) -> InstabotResult<u64>;

    /// Scroll `surface` to its bottom and settle
    fn scroll_to_bottom(&mut self, surface: Surface) -> InstabotResult<()>;

    /// Post references currently rendered on a tag feed
    fn visible_posts(&mut self) -> InstabotResult<Vec<Candidate>>;

    /// Usernames currently rendered in the followers panel
    fn visible_followers(&mut self) -> InstabotResult<Vec<String>>;

    /// Open a post and report its author and the UI follow state
    fn inspect_post(&mut self, candidate: &Candidate) -> InstabotResult<PostInfo>;

    /// Like the post opened by the last `inspect_post`
    fn like_post(&mut self) -> InstabotResult<()>;

    /// Comment on the post opened by the last `inspect_post`
    fn comment_post(&mut self, text: &str) -> InstabotResult<()>;

    /// Follow the author of the post opened by the last `inspect_post`
    fn follow_author(&mut self) -> InstabotResult<()>;

    /// Open a profile and report whether the UI shows it as followed
    fn profile_follow_state(&mut self, username: &str) -> InstabotResult<bool>;

    /// Unfollow the profile opened by the last `profile_follow_state`
    fn unfollow(&mut self, username: &str) -> InstabotResult<()>;
}

/// Durable storage for the relationship state document
#[mockall::automock]
pub trait StateStorage {
    /// Read the document, or `None` if nothing has been stored yet
    fn load(&self) -> InstabotResult<Option<StoreDocument>>;

    /// Replace the stored document
    fn save(&self, document: &StoreDocument) -> InstabotResult<()>;

    /// Human-readable location for error messages
    fn location(&self) -> String;
}

/// Source of the current calendar date
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

//! Site layer over a page driver
//!
//! Every URL, selector and button label lives in [`SiteLayout`]. `WebSite`
//! turns them into the [`SocialSite`] operations the orchestrators use,
//! settling after each navigation and state-changing click.

use std::time::Duration;

use shared::Phase;
use url::Url;

use crate::core::Candidate;
use crate::error::{InstabotError, InstabotResult};
use crate::traits::{Credentials, ElementHandle, Locator, PageDriver, PostInfo, SocialSite, Surface};

/// URLs, selectors and labels of the target site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLayout {
    pub base_url: String,
    pub login_path: String,
    pub username_field: Locator,
    pub password_field: Locator,
    pub login_button: Locator,
    /// Prompt shown after login on some accounts; absence is normal
    pub dismiss_prompt: Locator,
    pub page_links: Locator,
    /// Substring that marks a link as a post
    pub post_marker: String,
    pub post_author: Locator,
    pub post_follow_button: Locator,
    pub like_button: Locator,
    pub comment_box: Locator,
    pub followers_link: Locator,
    /// CSS selector of the scrollable followers panel
    pub followers_panel: String,
    pub panel_links: Locator,
    pub profile_follow_button: Locator,
    pub unfollow_confirm: Locator,
    pub follow_label: String,
    pub following_label: String,
}

impl Default for SiteLayout {
    fn default() -> Self {
        Self {
            base_url: "https://www.instagram.com/".to_string(),
            login_path: "accounts/login/".to_string(),
            username_field: Locator::Name("username".to_string()),
            password_field: Locator::Name("password".to_string()),
            login_button: Locator::css("form button[type=\"submit\"]"),
            dismiss_prompt: Locator::xpath("//button[text()=\"Not Now\"]"),
            page_links: Locator::xpath("//a[@href]"),
            post_marker: "/p/".to_string(),
            post_author: Locator::css("article header h2 a"),
            post_follow_button: Locator::css("article header button"),
            like_button: Locator::css("article section span button"),
            comment_box: Locator::css("article form textarea"),
            followers_link: Locator::PartialLinkText("followers".to_string()),
            followers_panel: "div[role=\"dialog\"] .isgrP".to_string(),
            panel_links: Locator::xpath(".//a[@href]"),
            profile_follow_button: Locator::css("header section button"),
            unfollow_confirm: Locator::xpath("//button[text()=\"Unfollow\"]"),
            follow_label: "Follow".to_string(),
            following_label: "Following".to_string(),
        }
    }
}

/// Username in a profile link: the second-to-last `/` segment, so
/// `https://host/bob/` gives `bob`
pub fn username_from_profile_link(href: &str) -> Option<String> {
    let segments: Vec<&str> = href.split('/').collect();
    segments
        .len()
        .checked_sub(2)
        .map(|idx| segments[idx])
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// [`SocialSite`] implemented by driving pages through a [`PageDriver`]
pub struct WebSite<D: PageDriver> {
    driver: D,
    layout: SiteLayout,
    settle: Duration,
    username: Option<String>,
    followers_panel: Option<ElementHandle>,
    post_follow_button: Option<ElementHandle>,
    profile_follow_button: Option<ElementHandle>,
}

impl<D: PageDriver> WebSite<D> {
    pub fn new(driver: D, layout: SiteLayout, settle: Duration) -> Self {
        Self {
            driver,
            layout,
            settle,
            username: None,
            followers_panel: None,
            post_follow_button: None,
            profile_follow_button: None,
        }
    }

    fn settle(&self) {
        self.driver.wait_fixed(self.settle);
    }

    fn url(&self, path: &str) -> InstabotResult<Url> {
        Url::parse(&self.layout.base_url)
            .and_then(|base| base.join(path))
            .map_err(|e| InstabotError::config(format!("site url '{path}': {e}")))
    }

    fn go(&mut self, url: &str) -> InstabotResult<()> {
        self.post_follow_button = None;
        self.profile_follow_button = None;
        self.driver.navigate(url)?;
        self.settle();
        Ok(())
    }

    fn click_and_settle(&self, element: &ElementHandle) -> InstabotResult<()> {
        self.driver.click(element)?;
        self.settle();
        Ok(())
    }

    fn panel_query(&self) -> String {
        let selector = serde_json::to_string(&self.layout.followers_panel).unwrap_or_default();
        format!("document.querySelector({selector})")
    }

    fn height_script(&self, surface: Surface) -> String {
        match surface {
            Surface::TagFeed => "return document.body.scrollHeight".to_string(),
            Surface::FollowersDialog => format!("return {}.scrollHeight", self.panel_query()),
        }
    }

    fn scroll_script(&self, surface: Surface) -> String {
        match surface {
            Surface::TagFeed => "window.scrollTo(0, document.body.scrollHeight)".to_string(),
            Surface::FollowersDialog => format!("var panel = {}; panel.scrollTop = panel.scrollHeight", self.panel_query()),
        }
    }

    fn hrefs(&self, elements: &[ElementHandle]) -> InstabotResult<Vec<String>> {
        let mut hrefs = Vec::with_capacity(elements.len());
        for element in elements {
            if let Some(href) = self.driver.attribute(element, "href")? {
                hrefs.push(href);
            }
        }
        Ok(hrefs)
    }
}

impl<D: PageDriver> SocialSite for WebSite<D> {
    fn login(&mut self, credentials: &Credentials) -> InstabotResult<()> {
        let login = self.url(&self.layout.login_path)?;
        self.go(login.as_str())?;

        let username_box = self.driver.find_element(&self.layout.username_field)?;
        let password_box = self.driver.find_element(&self.layout.password_field)?;
        let login_button = self.driver.find_element(&self.layout.login_button)?;

        self.driver.send_keys(&username_box, &credentials.username)?;
        self.driver.send_keys(&password_box, &credentials.password)?;
        self.click_and_settle(&login_button)?;

        if let Some(prompt) = self.driver.find_element_optional(&self.layout.dismiss_prompt)? {
            self.click_and_settle(&prompt)?;
        }

        self.username = Some(credentials.username.clone());
        shared::phase_info!(Phase::current(), "🔑 Logged in as {}", credentials.username);
        Ok(())
    }

    fn open_tag_feed(&mut self, tag: &str) -> InstabotResult<()> {
        let url = self.url(&format!("explore/tags/{tag}/"))?;
        self.go(url.as_str())
    }

    fn open_followers(&mut self) -> InstabotResult<()> {
        let username = self.username.clone().ok_or_else(|| InstabotError::PageState {
            message: "followers requested before login".to_string(),
        })?;
        let profile = self.url(&format!("{username}/"))?;
        self.go(profile.as_str())?;

        let link = self.driver.find_element(&self.layout.followers_link)?;
        self.click_and_settle(&link)?;

        let panel = self.driver.find_element(&Locator::Css(self.layout.followers_panel.clone()))?;
        self.followers_panel = Some(panel);
        Ok(())
    }

    fn content_height(&mut self, surface: Surface) -> InstabotResult<u64> {
        let value = self.driver.run_script(&self.height_script(surface))?;
        value
            .as_u64()
            .or_else(|| value.as_f64().map(|h| h.max(0.0) as u64))
            .ok_or_else(|| InstabotError::driver(format!("scroll height is not a number: {value}")))
    }

    fn scroll_to_bottom(&mut self, surface: Surface) -> InstabotResult<()> {
        self.driver.run_script(&self.scroll_script(surface))?;
        self.settle();
        Ok(())
    }

    fn visible_posts(&mut self) -> InstabotResult<Vec<Candidate>> {
        let links = self.driver.find_elements(&self.layout.page_links)?;
        Ok(self
            .hrefs(&links)?
            .into_iter()
            .filter(|href| href.contains(&self.layout.post_marker))
            .map(|href| match self.url(&href) {
                Ok(absolute) => Candidate::new(absolute.to_string()),
                Err(_) => Candidate::new(href),
            })
            .collect())
    }

    fn visible_followers(&mut self) -> InstabotResult<Vec<String>> {
        let panel = self.followers_panel.clone().ok_or_else(|| InstabotError::PageState {
            message: "followers panel is not open".to_string(),
        })?;
        let links = self.driver.find_elements_within(&panel, &self.layout.panel_links)?;
        Ok(self
            .hrefs(&links)?
            .iter()
            .filter_map(|href| username_from_profile_link(href))
            .collect())
    }

    fn inspect_post(&mut self, candidate: &Candidate) -> InstabotResult<PostInfo> {
        self.go(candidate.as_str())?;

        let author_link = self.driver.find_element(&self.layout.post_author)?;
        let author = self.driver.text(&author_link)?.trim().to_string();
        let button = self.driver.find_element(&self.layout.post_follow_button)?;
        let label = self.driver.text(&button)?;

        self.post_follow_button = Some(button);
        Ok(PostInfo {
            author,
            already_following: label.trim() != self.layout.follow_label,
        })
    }

    fn like_post(&mut self) -> InstabotResult<()> {
        if self.post_follow_button.is_none() {
            return Err(InstabotError::PageState {
                message: "like requested with no post open".to_string(),
            });
        }
        let like = self.driver.find_element(&self.layout.like_button)?;
        self.click_and_settle(&like)
    }

    fn comment_post(&mut self, text: &str) -> InstabotResult<()> {
        let comment_box = self.driver.find_element(&self.layout.comment_box)?;
        self.driver.click(&comment_box)?;
        self.driver.send_keys(&comment_box, &format!("{text}\n"))?;
        self.settle();
        Ok(())
    }

    fn follow_author(&mut self) -> InstabotResult<()> {
        let button = self.post_follow_button.take().ok_or_else(|| InstabotError::PageState {
            message: "follow requested with no post open".to_string(),
        })?;
        self.click_and_settle(&button)
    }

    fn profile_follow_state(&mut self, username: &str) -> InstabotResult<bool> {
        let profile = self.url(&format!("{username}/"))?;
        self.go(profile.as_str())?;

        let button = self.driver.find_element(&self.layout.profile_follow_button)?;
        let label = self.driver.text(&button)?;
        self.profile_follow_button = Some(button);
        Ok(label.trim() == self.layout.following_label)
    }

    fn unfollow(&mut self, username: &str) -> InstabotResult<()> {
        let button = self.profile_follow_button.take().ok_or_else(|| InstabotError::PageState {
            message: format!("unfollow of {username} requested with no profile open"),
        })?;
        self.click_and_settle(&button)?;

        let confirm = self.driver.find_element(&self.layout.unfollow_confirm)?;
        self.click_and_settle(&confirm)
    }
}

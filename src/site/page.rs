//! Named content pages.

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Page {
    Index,
    Login,
    AboutUs,
    TheWedding,
    Chicago,
    Accommodations,
    Photos,
    Rsvp,
    AboutWebsite,
}

impl Page {
    pub const ALL: [Self; 9] = [
        Self::Index,
        Self::Login,
        Self::AboutUs,
        Self::TheWedding,
        Self::Chicago,
        Self::Accommodations,
        Self::Photos,
        Self::Rsvp,
        Self::AboutWebsite,
    ];

    /// Route name, also used to highlight the active navigation entry.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Login => "login",
            Self::AboutUs => "about-us",
            Self::TheWedding => "the-wedding",
            Self::Chicago => "chicago",
            Self::Accommodations => "accommodations",
            Self::Photos => "photos",
            Self::Rsvp => "rsvp",
            Self::AboutWebsite => "about-website",
        }
    }

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Index => "/",
            Self::Login => "/login",
            Self::AboutUs => "/about-us",
            Self::TheWedding => "/the-wedding",
            Self::Chicago => "/chicago",
            Self::Accommodations => "/accommodations",
            Self::Photos => "/photos",
            Self::Rsvp => "/rsvp",
            Self::AboutWebsite => "/about-website",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Index => "Home",
            Self::Login => "Log in",
            Self::AboutUs => "About Us",
            Self::TheWedding => "The Wedding",
            Self::Chicago => "Chicago",
            Self::Accommodations => "Accommodations",
            Self::Photos => "Photos",
            Self::Rsvp => "RSVP",
            Self::AboutWebsite => "About this Website",
        }
    }

    /// Everything but the login page sits behind the session gate.
    #[must_use]
    pub const fn requires_session(self) -> bool {
        !matches!(self, Self::Login)
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|page| page.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_login_is_public() {
        let public: Vec<_> = Page::ALL
            .into_iter()
            .filter(|page| !page.requires_session())
            .collect();
        assert_eq!(public, vec![Page::Login]);
    }

    #[test]
    fn paths_follow_names() {
        for page in Page::ALL {
            assert_eq!(Page::from_name(page.name()), Some(page));
            if page != Page::Index {
                assert_eq!(page.path(), format!("/{}", page.name()));
            }
        }
        assert_eq!(Page::Index.path(), "/");
    }
}

use crate::i18n::Locale;

/// All localized user-facing strings for a locale
///
/// Strings are stored raw. The page renderer escapes them for HTML.
#[derive(Debug, Clone)]
pub struct LocaleStrings {
    // ==================== Site Chrome ====================
    /// Site title shown in `<title>` and the header
    pub site_title: &'static str,

    /// Tagline under the site title on the home page
    pub tagline: &'static str,

    pub nav_home: &'static str,
    pub nav_blog: &'static str,
    pub nav_projects: &'static str,

    /// Label for the link to the other locale
    pub switch_language: &'static str,

    // ==================== Listings ====================
    pub latest_posts: &'static str,
    pub featured_projects: &'static str,
    pub no_posts: &'static str,
    pub no_projects: &'static str,
    pub view_grid: &'static str,
    pub view_list: &'static str,
    pub read_more: &'static str,

    // ==================== Detail Pages ====================
    pub published_on: &'static str,
    pub visit_project: &'static str,
    pub view_source: &'static str,
    pub back_to_blog: &'static str,
    pub back_to_projects: &'static str,

    // ==================== Comments ====================
    pub comments_heading: &'static str,
    pub no_comments: &'static str,
    pub reply_label: &'static str,

    // ==================== Errors ====================
    pub not_found: &'static str,
    pub load_failed: &'static str,
}

impl LocaleStrings {
    pub fn for_locale(locale: Locale) -> &'static LocaleStrings {
        match locale {
            Locale::English => &ENGLISH_STRINGS,
            Locale::Chinese => &CHINESE_STRINGS,
        }
    }
}

// ==================== English Strings ====================

pub const ENGLISH_STRINGS: LocaleStrings = LocaleStrings {
    site_title: "Portfolio & Blog",
    tagline: "Notes, projects and experiments.",
    nav_home: "Home",
    nav_blog: "Blog",
    nav_projects: "Projects",
    switch_language: "中文",

    latest_posts: "Latest posts",
    featured_projects: "Projects",
    no_posts: "No posts yet.",
    no_projects: "No projects yet.",
    view_grid: "Grid",
    view_list: "List",
    read_more: "Read more",

    published_on: "Published on",
    visit_project: "Visit project",
    view_source: "Source code",
    back_to_blog: "Back to blog",
    back_to_projects: "Back to projects",

    comments_heading: "Comments",
    no_comments: "No comments yet. Be the first!",
    reply_label: "Reply",

    not_found: "Page not found",
    load_failed: "Content could not be loaded. Please try again later.",
};

// ==================== Chinese Strings ====================

pub const CHINESE_STRINGS: LocaleStrings = LocaleStrings {
    site_title: "作品集与博客",
    tagline: "笔记、项目与实验。",
    nav_home: "首页",
    nav_blog: "博客",
    nav_projects: "项目",
    switch_language: "English",

    latest_posts: "最新文章",
    featured_projects: "项目",
    no_posts: "暂无文章。",
    no_projects: "暂无项目。",
    view_grid: "网格",
    view_list: "列表",
    read_more: "阅读全文",

    published_on: "发布于",
    visit_project: "访问项目",
    view_source: "源代码",
    back_to_blog: "返回博客",
    back_to_projects: "返回项目",

    comments_heading: "评论",
    no_comments: "暂无评论，快来抢沙发！",
    reply_label: "回复",

    not_found: "页面不存在",
    load_failed: "内容加载失败，请稍后再试。",
};

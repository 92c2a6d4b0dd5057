//! HTML building blocks for the page renderers.
//!
//! Markup is assembled with `format!`; every piece of CMS text goes through
//! [`escape`] on the way in.

use crate::content::{thread_comments, BlogPost, Comment, Project};
use crate::i18n::Locale;
use crate::notion::{plain_text, Block, RichText};
use crate::widgets::image::{ImageFallback, IMAGE_RETRY_SCRIPT};
use crate::widgets::progress::{progress_bar, PROGRESS_SCRIPT};
use crate::widgets::ViewMode;
use chrono::{DateTime, NaiveDate, Utc};

/// Escape text for use in HTML content and attribute values.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Only links that cannot run script are rendered as anchors.
fn safe_href(href: &str) -> bool {
    let lower = href.trim().to_ascii_lowercase();
    lower.starts_with("https://")
        || lower.starts_with("http://")
        || lower.starts_with("mailto:")
        || (lower.starts_with('/') && !lower.starts_with("//"))
}

pub fn format_date(date: NaiveDate, locale: Locale) -> String {
    match locale {
        Locale::English => date.format("%B %-d, %Y").to_string(),
        Locale::Chinese => date.format("%Y年%-m月%-d日").to_string(),
    }
}

fn format_timestamp(timestamp: DateTime<Utc>, locale: Locale) -> String {
    format_date(timestamp.date_naive(), locale)
}

pub fn render_rich_text(runs: &[RichText]) -> String {
    runs.iter()
        .map(|run| {
            let mut html = escape(&run.plain_text);
            if run.annotations.code {
                html = format!("<code>{}</code>", html);
            }
            if run.annotations.bold {
                html = format!("<strong>{}</strong>", html);
            }
            if run.annotations.italic {
                html = format!("<em>{}</em>", html);
            }
            match run.href.as_deref() {
                Some(href) if safe_href(href) => {
                    format!(r#"<a href="{}" rel="noopener">{}</a>"#, escape(href), html)
                }
                _ => html,
            }
        })
        .collect()
}

#[derive(Clone, Copy, PartialEq)]
enum ListKind {
    Bulleted,
    Numbered,
}

/// Render post body blocks, grouping consecutive list items.
pub fn render_blocks(blocks: &[Block]) -> String {
    let mut html = String::new();
    let mut open_list: Option<ListKind> = None;

    for block in blocks {
        let list_kind = match block {
            Block::BulletedListItem { .. } => Some(ListKind::Bulleted),
            Block::NumberedListItem { .. } => Some(ListKind::Numbered),
            _ => None,
        };

        if open_list != list_kind {
            match open_list {
                Some(ListKind::Bulleted) => html.push_str("</ul>"),
                Some(ListKind::Numbered) => html.push_str("</ol>"),
                None => {}
            }
            match list_kind {
                Some(ListKind::Bulleted) => html.push_str("<ul>"),
                Some(ListKind::Numbered) => html.push_str("<ol>"),
                None => {}
            }
            open_list = list_kind;
        }

        match block {
            Block::Paragraph { paragraph } => {
                html.push_str(&format!("<p>{}</p>", render_rich_text(&paragraph.rich_text)))
            }
            Block::Heading1 { heading_1 } => {
                html.push_str(&format!("<h2>{}</h2>", render_rich_text(&heading_1.rich_text)))
            }
            Block::Heading2 { heading_2 } => {
                html.push_str(&format!("<h3>{}</h3>", render_rich_text(&heading_2.rich_text)))
            }
            Block::Heading3 { heading_3 } => {
                html.push_str(&format!("<h4>{}</h4>", render_rich_text(&heading_3.rich_text)))
            }
            Block::BulletedListItem { bulleted_list_item: item }
            | Block::NumberedListItem { numbered_list_item: item } => {
                html.push_str(&format!("<li>{}</li>", render_rich_text(&item.rich_text)))
            }
            Block::Quote { quote } => html.push_str(&format!(
                "<blockquote>{}</blockquote>",
                render_rich_text(&quote.rich_text)
            )),
            Block::Code { code } => html.push_str(&format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                escape(&code.language),
                escape(&plain_text(&code.rich_text))
            )),
            Block::Image { image } => {
                let caption = plain_text(&image.caption);
                html.push_str(&format!(
                    "<figure>{}{}</figure>",
                    image_tag(image.source().map(|file| file.url.as_str()), &caption, "post-image"),
                    if caption.is_empty() {
                        String::new()
                    } else {
                        format!("<figcaption>{}</figcaption>", escape(&caption))
                    }
                ))
            }
            Block::Divider => html.push_str("<hr>"),
            Block::Unsupported => {}
        }
    }

    match open_list {
        Some(ListKind::Bulleted) => html.push_str("</ul>"),
        Some(ListKind::Numbered) => html.push_str("</ol>"),
        None => {}
    }

    html
}

/// `<img>` wired to the fallback script.
pub fn image_tag(src: Option<&str>, alt: &str, class: &str) -> String {
    let fallback = ImageFallback::new(src);
    let data: String = fallback
        .data_attributes()
        .into_iter()
        .map(|(name, value)| format!(r#" {}="{}""#, name, escape(&value)))
        .collect();

    format!(
        r#"<img class="{}" src="{}" alt="{}" loading="lazy"{}>"#,
        class,
        escape(fallback.initial_src()),
        escape(alt),
        data
    )
}

fn tag_list(tags: &[String]) -> String {
    if tags.is_empty() {
        return String::new();
    }
    let items: String = tags
        .iter()
        .map(|tag| format!(r#"<li class="tag">{}</li>"#, escape(tag)))
        .collect();
    format!(r#"<ul class="tags">{}</ul>"#, items)
}

pub fn view_toggle(locale: Locale, route: &str, mode: ViewMode) -> String {
    let strings = locale.strings();
    let link = |target: ViewMode, label: &str| {
        let current = if target == mode { r#" aria-current="true""# } else { "" };
        format!(
            r#"<a href="{}?view={}"{}>{}</a>"#,
            locale.path(route),
            target.as_str(),
            current,
            escape(label)
        )
    };
    format!(
        r#"<nav class="view-toggle">{} {}</nav>"#,
        link(ViewMode::Grid, strings.view_grid),
        link(ViewMode::List, strings.view_list)
    )
}

pub fn post_list(posts: &[BlogPost], locale: Locale, mode: ViewMode) -> String {
    let strings = locale.strings();
    if posts.is_empty() {
        return format!(r#"<p class="empty">{}</p>"#, escape(strings.no_posts));
    }

    let items: String = posts
        .iter()
        .map(|post| {
            let href = post.url_path();
            let date = post
                .published
                .map(|d| format!("<time>{}</time>", format_date(d, locale)))
                .unwrap_or_default();
            let cover = match mode {
                ViewMode::Grid => image_tag(post.cover_image.as_deref(), &post.title, "cover"),
                ViewMode::List => String::new(),
            };
            format!(
                r#"<article class="card">{}<h3><a href="{}">{}</a></h3>{}<p>{}</p>{}<a href="{}">{}</a></article>"#,
                cover,
                escape(&href),
                escape(&post.title),
                date,
                escape(&post.summary),
                tag_list(&post.tags),
                escape(&href),
                escape(strings.read_more)
            )
        })
        .collect();

    format!(r#"<div class="posts {}">{}</div>"#, mode.as_str(), items)
}

pub fn project_list(projects: &[Project], locale: Locale, mode: ViewMode) -> String {
    let strings = locale.strings();
    if projects.is_empty() {
        return format!(r#"<p class="empty">{}</p>"#, escape(strings.no_projects));
    }

    let items: String = projects
        .iter()
        .map(|project| {
            let href = project.url_path();
            let cover = match mode {
                ViewMode::Grid => {
                    image_tag(project.cover_image.as_deref(), &project.title, "cover")
                }
                ViewMode::List => String::new(),
            };
            format!(
                r#"<article class="card">{}<h3><a href="{}">{}</a></h3><p>{}</p>{}</article>"#,
                cover,
                escape(&href),
                escape(&project.title),
                escape(&project.description),
                tag_list(&project.tags)
            )
        })
        .collect();

    format!(r#"<div class="projects {}">{}</div>"#, mode.as_str(), items)
}

pub fn project_article(project: &Project, locale: Locale) -> String {
    let strings = locale.strings();
    let mut links = String::new();
    if let Some(url) = project.url.as_deref().filter(|u| safe_href(u)) {
        links.push_str(&format!(
            r#"<a href="{}" rel="noopener">{}</a>"#,
            escape(url),
            escape(strings.visit_project)
        ));
    }
    if let Some(url) = project.repository_url.as_deref().filter(|u| safe_href(u)) {
        links.push_str(&format!(
            r#"<a href="{}" rel="noopener">{}</a>"#,
            escape(url),
            escape(strings.view_source)
        ));
    }

    format!(
        r#"<article class="project"><h1>{}</h1>{}{}<p>{}</p><p class="links">{}</p><a href="{}">{}</a></article>"#,
        escape(&project.title),
        image_tag(project.cover_image.as_deref(), &project.title, "cover"),
        tag_list(&project.tags),
        escape(&project.description),
        links,
        locale.path("/projects"),
        escape(strings.back_to_projects)
    )
}

pub fn post_article(post: &BlogPost, blocks: &[Block], comments: &[Comment], locale: Locale) -> String {
    let strings = locale.strings();
    let date = post
        .published
        .map(|d| {
            format!(
                "<p class=\"meta\">{} <time>{}</time></p>",
                escape(strings.published_on),
                format_date(d, locale)
            )
        })
        .unwrap_or_default();

    format!(
        r#"{}<article class="post"><h1>{}</h1>{}{}{}<div class="body">{}</div></article>{}<a href="{}">{}</a>"#,
        progress_bar(),
        escape(&post.title),
        date,
        tag_list(&post.tags),
        post.cover_image
            .as_deref()
            .map(|src| image_tag(Some(src), &post.title, "cover"))
            .unwrap_or_default(),
        render_blocks(blocks),
        comments_section(comments, locale),
        locale.path("/blog"),
        escape(strings.back_to_blog)
    )
}

fn comment_item(comment: &Comment, locale: Locale) -> String {
    let author = match comment.author.website.as_deref().filter(|u| safe_href(u)) {
        Some(site) => format!(
            r#"<a href="{}" rel="nofollow noopener">{}</a>"#,
            escape(site),
            escape(&comment.author.name)
        ),
        None => escape(&comment.author.name),
    };
    format!(
        r#"<div class="comment" id="comment-{}"><p class="meta"><strong>{}</strong> <time>{}</time></p><p>{}</p></div>"#,
        escape(&comment.id),
        author,
        format_timestamp(comment.created_at, locale),
        escape(&comment.content)
    )
}

pub fn comments_section(comments: &[Comment], locale: Locale) -> String {
    let strings = locale.strings();
    if comments.is_empty() {
        return format!(
            r#"<section class="comments"><h2>{}</h2><p class="empty">{}</p></section>"#,
            escape(strings.comments_heading),
            escape(strings.no_comments)
        );
    }

    let threads: String = thread_comments(comments)
        .into_iter()
        .map(|thread| {
            let replies: String = thread
                .replies
                .iter()
                .map(|reply| comment_item(reply, locale))
                .collect();
            let replies = if replies.is_empty() {
                replies
            } else {
                format!(
                    r#"<div class="replies" aria-label="{}">{}</div>"#,
                    escape(strings.reply_label),
                    replies
                )
            };
            format!(
                r#"<li>{}{}</li>"#,
                comment_item(thread.comment, locale),
                replies
            )
        })
        .collect();

    format!(
        r#"<section class="comments"><h2>{} ({})</h2><ol>{}</ol></section>"#,
        escape(strings.comments_heading),
        comments.len(),
        threads
    )
}

/// Per-page metadata for the shared layout.
pub struct PageMeta<'a> {
    pub title: Option<&'a str>,
    pub locale: Locale,
    /// Section route under the locale prefix, used for the language switcher
    pub section: &'a str,
    /// Full site path of a detail page; index pages are canonical at `section`
    pub canonical: Option<String>,
    pub site_url: &'a str,
    pub reading_progress: bool,
}

pub fn layout(meta: &PageMeta<'_>, body: &str) -> String {
    let locale = meta.locale;
    let strings = locale.strings();
    let title = match meta.title {
        Some(title) => format!("{} | {}", escape(title), escape(strings.site_title)),
        None => escape(strings.site_title),
    };
    let alternate = locale.alternate();
    let progress_script = if meta.reading_progress {
        format!("<script>{}</script>", PROGRESS_SCRIPT)
    } else {
        String::new()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="canonical" href="{site}{canonical}">
<link rel="alternate" hreflang="{alt_lang}" href="{site}{alt_path}">
</head>
<body>
<header>
<a class="brand" href="{home}">{site_title}</a>
<nav>
<a href="{home}">{nav_home}</a>
<a href="{blog}">{nav_blog}</a>
<a href="{projects}">{nav_projects}</a>
<a href="{alt_path}" hreflang="{alt_lang}">{switch}</a>
</nav>
</header>
<main>
{body}
</main>
<script>{image_script}</script>
{progress_script}
</body>
</html>"#,
        lang = locale.html_lang(),
        title = title,
        site = escape(meta.site_url),
        canonical = meta
            .canonical
            .clone()
            .unwrap_or_else(|| locale.path(meta.section)),
        alt_lang = alternate.html_lang(),
        alt_path = alternate.path(meta.section),
        home = locale.path(""),
        site_title = escape(strings.site_title),
        nav_home = escape(strings.nav_home),
        nav_blog = escape(strings.nav_blog),
        nav_projects = escape(strings.nav_projects),
        blog = locale.path("/blog"),
        projects = locale.path("/projects"),
        switch = escape(strings.switch_language),
        body = body,
        image_script = IMAGE_RETRY_SCRIPT,
        progress_script = progress_script,
    )
}

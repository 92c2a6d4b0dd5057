//! Reading progress bar for blog posts.
//!
//! The bar's bounds are carried on the element as ARIA attributes and the
//! script clamps the scrolled percentage to them, so screen readers and the
//! rendered width agree.

pub const PROGRESS_BAR_ID: &str = "reading-progress";

pub const PROGRESS_MIN: u8 = 0;
pub const PROGRESS_MAX: u8 = 100;

/// The bar element, starting empty.
pub fn progress_bar() -> String {
    format!(
        r#"<div id="{}" class="progress" role="progressbar" aria-valuemin="{}" aria-valuemax="{}" aria-valuenow="{}"></div>"#,
        PROGRESS_BAR_ID, PROGRESS_MIN, PROGRESS_MAX, PROGRESS_MIN
    )
}

/// Updates the bar at most once per animation frame. A page that fits in
/// the viewport stays at the minimum.
pub const PROGRESS_SCRIPT: &str = r#"(function () {
  var bar = document.getElementById('reading-progress');
  if (!bar) return;
  var min = Number(bar.getAttribute('aria-valuemin'));
  var max = Number(bar.getAttribute('aria-valuemax'));
  var pending = false;
  function update() {
    var doc = document.documentElement;
    var scrollable = doc.scrollHeight - doc.clientHeight;
    var pct = scrollable > 0 ? doc.scrollTop / scrollable * 100 : min;
    pct = Math.min(max, Math.max(min, pct || min));
    bar.style.width = pct + '%';
    bar.setAttribute('aria-valuenow', Math.round(pct));
    pending = false;
  }
  window.addEventListener('scroll', function () {
    if (pending) return;
    pending = true;
    window.requestAnimationFrame(update);
  }, { passive: true });
})();"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_markup() {
        let bar = progress_bar();
        assert!(bar.starts_with(r#"<div id="reading-progress""#));
        assert!(bar.contains(r#"role="progressbar""#));
        assert!(bar.contains(r#"aria-valuemin="0" aria-valuemax="100" aria-valuenow="0""#));
    }

    #[test]
    fn test_script_reads_the_emitted_element() {
        assert!(PROGRESS_SCRIPT.contains(&format!("getElementById('{}')", PROGRESS_BAR_ID)));
        assert!(PROGRESS_SCRIPT.contains("getAttribute('aria-valuemin')"));
        assert!(PROGRESS_SCRIPT.contains("getAttribute('aria-valuemax')"));
        assert!(PROGRESS_SCRIPT.contains("requestAnimationFrame"));
    }
}

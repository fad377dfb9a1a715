/// Name of the async function the test source must define.
pub const ENTRY_POINT: &str = "runTest";

/// Interaction helpers available to test source. They record into the
/// `__results` object declared by the wrapper.
pub const INTERACTION_LIBRARY: &str = r#"
  const sleep = (ms) => new Promise((resolve) => setTimeout(resolve, ms));

  const waitForElement = (selector, timeout = 5000) => new Promise((resolve, reject) => {
    const started = Date.now();
    const poll = () => {
      const el = document.querySelector(selector);
      if (el) { resolve(el); return; }
      if (Date.now() - started >= timeout) {
        reject(new Error('Element not found: ' + selector + ' (waited ' + timeout + ' ms)'));
        return;
      }
      setTimeout(poll, 100);
    };
    poll();
  });

  const recordInteraction = (type, target, success) => {
    __results.interactions.push({ type, target: String(target), success: !!success });
    return !!success;
  };

  const simulateClick = async (selector) => {
    const el = await waitForElement(selector);
    el.dispatchEvent(new MouseEvent('click', { bubbles: true, cancelable: true, view: window }));
    return recordInteraction('click', selector, true);
  };

  const simulateHover = async (selector) => {
    const el = await waitForElement(selector);
    el.dispatchEvent(new MouseEvent('mouseover', { bubbles: true, view: window }));
    el.dispatchEvent(new MouseEvent('mouseenter', { bubbles: false, view: window }));
    return recordInteraction('hover', selector, true);
  };

  const simulateExitIntent = async () => {
    document.dispatchEvent(new MouseEvent('mouseout', { bubbles: true, clientY: -1, relatedTarget: null, view: window }));
    document.documentElement.dispatchEvent(new MouseEvent('mouseleave', { bubbles: false, clientY: -1, view: window }));
    return recordInteraction('exit-intent', 'document', true);
  };

  const scroll = async (target) => {
    if (typeof target === 'number') {
      window.scrollTo({ top: target, behavior: 'auto' });
    } else {
      const el = await waitForElement(target);
      el.scrollIntoView({ block: 'center' });
    }
    await sleep(100);
    return recordInteraction('scroll', target, true);
  };

  const getStorage = (key, area = 'local') => {
    try {
      const store = area === 'session' ? window.sessionStorage : window.localStorage;
      return store.getItem(key);
    } catch (e) {
      return null;
    }
  };

  const exists = (selector) => document.querySelector(selector) !== null;

  const isVisible = (selector) => {
    const el = document.querySelector(selector);
    if (!el) return false;
    const style = window.getComputedStyle(el);
    const rect = el.getBoundingClientRect();
    return style.display !== 'none' && style.visibility !== 'hidden'
      && parseFloat(style.opacity || '1') > 0 && rect.width > 0 && rect.height > 0;
  };

  const validate = (name, condition, expected, actual) => {
    const passed = !!condition;
    __results.validations.push({
      test: String(name),
      passed,
      expected: expected === undefined ? null : expected,
      actual: actual === undefined ? null : actual,
    });
    return passed;
  };
"#;

/// Assembles self-contained test scripts.
#[derive(Debug, Clone, Copy, Default)]
pub struct TestHarnessBuilder;

impl TestHarnessBuilder {
    /// Wrap `test_source` (which defines `runTest`) with the interaction
    /// library. The script always resolves to a result object.
    pub fn build(test_source: &str) -> String {
        format!(
            r#"(async () => {{
  const __results = {{ interactions: [], validations: [], overallStatus: 'error' }};
{library}
  try {{
{source}
    if (typeof {entry} !== 'function') {{
      throw new Error('{entry} is not defined by the test source');
    }}
    await {entry}();
    if (__results.validations.length === 0) {{
      __results.overallStatus = 'failed';
      __results.error = 'No validations were recorded';
    }} else {{
      __results.overallStatus = __results.validations.every((v) => v.passed) ? 'passed' : 'failed';
    }}
  }} catch (err) {{
    __results.overallStatus = 'error';
    __results.error = (err && err.message) ? String(err.message) : String(err);
  }}
  return __results;
}})()"#,
            library = INTERACTION_LIBRARY,
            source = test_source.trim_end(),
            entry = ENTRY_POINT,
        )
    }
}

//! The test harness and effect-mocking layer: a
//! process-wide runner holding recorded results plus glob-pattern mock
//! tables for the HTTP/file/env effect channels, consulted by every
//! built-in that performs a real external effect.

use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub skipped: bool,
    pub expect_fail: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockChannel {
    Http,
    File,
    Env,
}

/// What a matched or unmatched mock lookup resolves to.
pub enum EffectDecision {
    RealCall,
    Mocked(MockResponse),
    Blocked,
}

#[derive(Debug, Clone)]
pub enum MockResponse {
    Value(crate::value::Value),
    Error(crate::error::EvalError),
}

#[derive(Debug, Default)]
struct ChannelTable {
    active: bool,
    bypass: bool,
    patterns: Vec<(String, MockResponse)>,
}

/// Holds the process-global test state: accumulated results plus one mock
/// table per effect channel.
/// Guarded externally by `Arc<Mutex<_>>` (see `Evaluator::test_runner`) so
/// task-pool workers sharing an evaluator family see the same mock state.
#[derive(Debug, Default)]
pub struct TestRunner {
    results: Vec<TestResult>,
    channels: HashMap<MockChannel, ChannelTable>,
}

impl TestRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    pub fn record(&mut self, result: TestResult) {
        self.results.push(result);
    }

    /// Clears every channel's mock table. Run after each `testRun`/
    /// `testExpectFail` body.
    pub fn reset_mocks(&mut self) {
        self.channels.clear();
    }

    pub fn set_active(&mut self, channel: MockChannel, active: bool) {
        self.channels.entry(channel).or_default().active = active;
    }

    pub fn set_bypass(&mut self, channel: MockChannel, bypass: bool) {
        self.channels.entry(channel).or_default().bypass = bypass;
    }

    pub fn register(&mut self, channel: MockChannel, pattern: impl Into<String>, response: MockResponse) {
        self.channels.entry(channel).or_default().patterns.push((pattern.into(), response));
    }

    /// Resolves one external effect against `channel`'s mock table, with
    /// this four-step precedence: bypass, then matching pattern, then
    /// active-with-no-match is blocked, otherwise real.
    pub fn resolve(&self, channel: MockChannel, key: &str) -> EffectDecision {
        let Some(table) = self.channels.get(&channel) else {
            return EffectDecision::RealCall;
        };
        if table.bypass {
            return EffectDecision::RealCall;
        }
        if let Some((_, resp)) = table.patterns.iter().find(|(pat, _)| glob_match(pat, key)) {
            return EffectDecision::Mocked(resp.clone());
        }
        if table.active {
            return EffectDecision::Blocked;
        }
        EffectDecision::RealCall
    }
}

enum Token {
    Star,
    DoubleStar,
    Literal(char),
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '*' {
            if chars.get(i + 1) == Some(&'*') {
                out.push(Token::DoubleStar);
                i += 2;
            } else {
                out.push(Token::Star);
                i += 1;
            }
        } else {
            out.push(Token::Literal(chars[i]));
            i += 1;
        }
    }
    out
}

/// `*` matches any run of non-`/` characters, `**` matches any characters
/// including `/`, everything else matches literally.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let tokens = tokenize(pattern);
    let chars: Vec<char> = text.chars().collect();
    match_from(&tokens, 0, &chars, 0)
}

fn match_from(tokens: &[Token], ti: usize, text: &[char], si: usize) -> bool {
    if ti == tokens.len() {
        return si == text.len();
    }
    match &tokens[ti] {
        Token::Literal(c) => si < text.len() && text[si] == *c && match_from(tokens, ti + 1, text, si + 1),
        Token::Star => (si..=text.len())
            .take_while(|&end| !text[si..end].contains(&'/'))
            .any(|end| match_from(tokens, ti + 1, text, end)),
        Token::DoubleStar => (si..=text.len()).any(|end| match_from(tokens, ti + 1, text, end)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_does_not_cross_slash() {
        assert!(glob_match("/users/*", "/users/42"));
        assert!(!glob_match("/users/*", "/users/42/posts"));
    }

    #[test]
    fn double_star_crosses_slash() {
        assert!(glob_match("/users/**", "/users/42/posts"));
    }

    #[test]
    fn literal_characters_match_exactly() {
        assert!(glob_match("GET /health", "GET /health"));
        assert!(!glob_match("GET /health", "POST /health"));
    }

    #[test]
    fn bypass_wins_over_registered_pattern() {
        let mut runner = TestRunner::new();
        runner.register(MockChannel::Env, "HOME", MockResponse::Value(crate::value::Value::Int(1)));
        runner.set_bypass(MockChannel::Env, true);
        assert!(matches!(runner.resolve(MockChannel::Env, "HOME"), EffectDecision::RealCall));
    }

    #[test]
    fn active_with_no_match_blocks() {
        let mut runner = TestRunner::new();
        runner.set_active(MockChannel::Http, true);
        assert!(matches!(runner.resolve(MockChannel::Http, "GET /x"), EffectDecision::Blocked));
    }

    #[test]
    fn reset_clears_registered_patterns() {
        let mut runner = TestRunner::new();
        runner.set_active(MockChannel::File, true);
        runner.register(MockChannel::File, "*.txt", MockResponse::Value(crate::value::Value::Nil));
        runner.reset_mocks();
        assert!(matches!(runner.resolve(MockChannel::File, "a.txt"), EffectDecision::RealCall));
    }
}

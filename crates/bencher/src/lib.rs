/// A request to dispatch in a benchmark.
#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    group: TestGroup,
    target: TestTarget,
}

impl TestCase {
    pub fn new(name: &'static str, group: TestGroup, target: TestTarget) -> Self {
        Self { name, group, target }
    }

    pub fn small(name: &'static str, target: TestTarget) -> Self {
        Self::new(name, TestGroup::Small, target)
    }

    pub fn normal(name: &'static str, target: TestTarget) -> Self {
        Self::new(name, TestGroup::Normal, target)
    }

    pub fn large(name: &'static str, target: TestTarget) -> Self {
        Self::new(name, TestGroup::Large, target)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    pub fn target(&self) -> &TestTarget {
        &self.target
    }
}

/// Method, host and path of a benchmark request.
#[derive(Debug, Copy, Clone)]
pub struct TestTarget {
    method: &'static str,
    host: &'static str,
    path: &'static str,
}

impl TestTarget {
    pub const fn new(method: &'static str, host: &'static str, path: &'static str) -> Self {
        Self { method, host, path }
    }

    pub const fn get(path: &'static str) -> Self {
        Self::new("GET", "localhost", path)
    }

    pub fn method(&self) -> &'static str {
        self.method
    }

    pub fn host(&self) -> &'static str {
        self.host
    }

    pub fn path(&self) -> &'static str {
        self.path
    }
}

/// Size of the handler tree a case runs against.
#[derive(Clone, Copy, Debug)]
pub enum TestGroup {
    Small,
    Normal,
    Large,
}

impl TestGroup {
    /// Number of path rules registered for this group.
    pub fn rule_count(self) -> usize {
        match self {
            TestGroup::Small => 4,
            TestGroup::Normal => 32,
            TestGroup::Large => 256,
        }
    }
}

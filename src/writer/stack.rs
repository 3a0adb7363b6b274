use crate::core::Profile;

/// One open, not yet closed element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Declared profile with the sentinel already resolved.
    pub profile: Profile,
    pub is_visible: bool,
    pub prefix: Option<String>,
    pub local_name: String,
    /// Set once the start tag has reached the underlying writer.
    pub is_written: bool,
}

impl Frame {
    /// `prefix:local` or `local`.
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(p) => format!("{p}:{}", self.local_name),
            None => self.local_name.clone(),
        }
    }
}

/// Stack of pending element frames; the last entry is the innermost element.
#[derive(Debug, Default)]
pub struct ElementStack {
    frames: Vec<Frame>,
}

impl ElementStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a frame for `local_name`. [`Profile::UNKNOWN`] resolves to `active`.
    pub fn push(
        &mut self,
        prefix: Option<&str>,
        local_name: &str,
        profile: Profile,
        active: Profile,
    ) -> &Frame {
        let profile = if profile.is_unknown() { active } else { profile };
        self.frames.push(Frame {
            profile,
            is_visible: profile.is_compatible_with(active),
            prefix: prefix.map(str::to_owned),
            local_name: local_name.to_owned(),
            is_written: false,
        });
        &self.frames[self.frames.len() - 1]
    }

    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    pub fn top(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// True iff every open frame is visible. An empty stack is visible.
    pub fn is_node_visible(&self) -> bool {
        self.frames.iter().all(|f| f.is_visible)
    }

    /// Frames from the root towards the top that still need their start tag
    /// written, stopping at the first invisible frame.
    ///
    /// Returns the indices to flush and whether the walk reached the top.
    pub fn unwritten_path(&self) -> (Vec<usize>, bool) {
        let mut pending = Vec::new();
        for (i, frame) in self.frames.iter().enumerate() {
            if !frame.is_visible {
                return (pending, false);
            }
            if !frame.is_written {
                pending.push(i);
            }
        }
        (pending, true)
    }

    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn mark_written(&mut self, index: usize) {
        if let Some(frame) = self.frames.get_mut(index) {
            frame.is_written = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_inherits_active_profile() {
        let mut stack = ElementStack::new();
        let frame = stack.push(Some("ram"), "Name", Profile::UNKNOWN, Profile::EXTENDED);
        assert_eq!(frame.profile, Profile::EXTENDED);
        assert!(frame.is_visible);
        assert!(!frame.is_written);
        assert_eq!(frame.qualified_name(), "ram:Name");
    }

    #[test]
    fn visibility_is_decided_at_push() {
        let mut stack = ElementStack::new();
        stack.push(None, "A", Profile::EXTENDED, Profile::COMFORT);
        assert!(!stack.top().unwrap().is_visible);
        assert!(!stack.is_node_visible());
    }

    #[test]
    fn invisible_ancestor_hides_visible_child() {
        let mut stack = ElementStack::new();
        stack.push(None, "A", Profile::MINIMUM, Profile::COMFORT);
        stack.push(None, "B", Profile::UNKNOWN, Profile::COMFORT);
        assert!(stack.top().unwrap().is_visible);
        assert!(!stack.is_node_visible());
    }

    #[test]
    fn unwritten_path_skips_written_and_stops_at_invisible() {
        let active = Profile::COMFORT;
        let mut stack = ElementStack::new();
        stack.push(None, "A", Profile::UNKNOWN, active);
        stack.push(None, "B", Profile::UNKNOWN, active);
        stack.push(None, "C", Profile::BASIC, active);
        stack.push(None, "D", Profile::UNKNOWN, active);
        stack.mark_written(0);

        let (path, reached_top) = stack.unwritten_path();
        assert_eq!(path, vec![1]);
        assert!(!reached_top);
    }

    #[test]
    fn pop_returns_innermost() {
        let mut stack = ElementStack::new();
        stack.push(None, "A", Profile::UNKNOWN, Profile::BASIC);
        stack.push(None, "B", Profile::UNKNOWN, Profile::BASIC);
        assert_eq!(stack.pop().unwrap().local_name, "B");
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.pop().unwrap().local_name, "A");
        assert!(stack.pop().is_none());
        assert!(stack.is_empty());
    }
}

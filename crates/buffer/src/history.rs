use super::Position;

/// Action for undo/redo
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Text insertion
    Insert { position: Position, text: String },
    /// Text deletion
    Delete { position: Position, text: String },
    /// Actions undone and redone as one step (range replacement, replace all)
    Group { actions: Vec<Action> },
}

impl Action {
    /// Get inverse action
    pub fn inverse(&self) -> Action {
        match self {
            Action::Insert { position, text } => Action::Delete {
                position: *position,
                text: text.clone(),
            },
            Action::Delete { position, text } => Action::Insert {
                position: *position,
                text: text.clone(),
            },
            Action::Group { actions } => Action::Group {
                actions: actions.iter().rev().map(|a| a.inverse()).collect(),
            },
        }
    }

    /// Check if can merge with another action
    pub fn can_merge_with(&self, other: &Action) -> bool {
        match (self, other) {
            // Typing: consecutive single-character insertions on one line
            (
                Action::Insert {
                    position: pos1,
                    text: text1,
                },
                Action::Insert {
                    position: pos2,
                    text: text2,
                },
            ) => {
                pos1.line == pos2.line
                    && text2.chars().count() == 1
                    && !text2.contains('\n')
                    && !text1.contains('\n')
                    && pos2.column == pos1.column + text1.chars().count()
            }
            // Backspace: deletions moving to the left
            (
                Action::Delete {
                    position: pos1,
                    text: text1,
                },
                Action::Delete {
                    position: pos2,
                    text: text2,
                },
            ) => {
                pos1.line == pos2.line
                    && text2.chars().count() == 1
                    && !text2.contains('\n')
                    && !text1.contains('\n')
                    && pos2.column + 1 == pos1.column
            }
            _ => false,
        }
    }

    /// Merge with another action
    pub fn merge(&mut self, other: Action) {
        match (self, other) {
            (Action::Insert { text: text1, .. }, Action::Insert { text: text2, .. }) => {
                text1.push_str(&text2);
            }
            (
                Action::Delete {
                    position,
                    text: text1,
                },
                Action::Delete {
                    position: pos2,
                    text: text2,
                },
            ) => {
                *position = pos2;
                text1.insert_str(0, &text2);
            }
            _ => {}
        }
    }
}

/// Edit history for undo/redo
#[derive(Debug, Clone)]
pub struct History {
    /// Action stack for undo
    undo_stack: Vec<Action>,
    /// Action stack for redo
    redo_stack: Vec<Action>,
    /// Maximum history size
    max_size: usize,
    /// Current accumulated action
    pending_action: Option<Action>,
    /// Actions collected while a group is open
    group: Option<Vec<Action>>,
    /// Nesting depth of open groups
    group_depth: usize,
}

impl History {
    /// Create a new history
    pub fn new() -> Self {
        Self::with_capacity(1000)
    }

    /// Create history with specified size
    pub fn with_capacity(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size: max_size.max(1),
            pending_action: None,
            group: None,
            group_depth: 0,
        }
    }

    /// Record action to history
    pub fn push(&mut self, action: Action) {
        self.redo_stack.clear();

        if let Some(group) = &mut self.group {
            group.push(action);
            return;
        }

        self.accumulate(action);
    }

    /// Merge into the pending action when possible, otherwise start a new one
    fn accumulate(&mut self, action: Action) {
        if let Some(pending) = &mut self.pending_action {
            if pending.can_merge_with(&action) {
                pending.merge(action);
                return;
            }
            self.commit_pending();
        }

        self.pending_action = Some(action);
    }

    /// Open a group: everything pushed until the matching `end_group`
    /// becomes a single undo step. Groups nest.
    pub fn begin_group(&mut self) {
        if self.group_depth == 0 {
            self.group = Some(Vec::new());
        }
        self.group_depth += 1;
    }

    /// Close the innermost group
    pub fn end_group(&mut self) {
        if self.group_depth == 0 {
            return;
        }
        self.group_depth -= 1;
        if self.group_depth > 0 {
            return;
        }

        if let Some(mut actions) = self.group.take() {
            match actions.len() {
                0 => {}
                1 => self.accumulate(actions.remove(0)),
                _ => {
                    self.commit_pending();
                    self.push_completed(Action::Group { actions });
                }
            }
        }
    }

    /// Complete current action group (e.g., on focus loss)
    pub fn commit_pending(&mut self) {
        if let Some(action) = self.pending_action.take() {
            self.push_completed(action);
        }
    }

    fn push_completed(&mut self, action: Action) {
        self.undo_stack.push(action);
        if self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }
    }

    /// Undo last action, returning the action to apply to the text
    pub fn undo(&mut self) -> Option<Action> {
        self.commit_pending();

        let action = self.undo_stack.pop()?;
        let inverse = action.inverse();
        self.redo_stack.push(action);
        Some(inverse)
    }

    /// Redo undone action
    pub fn redo(&mut self) -> Option<Action> {
        self.commit_pending();

        // The original action is re-applied and becomes undoable again
        let action = self.redo_stack.pop()?;
        self.undo_stack.push(action.clone());
        Some(action)
    }

    /// Check if undo is possible
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty() || self.pending_action.is_some()
    }

    /// Check if redo is possible
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Clear history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.pending_action = None;
        self.group = None;
        self.group_depth = 0;
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(line: usize, column: usize, text: &str) -> Action {
        Action::Insert {
            position: Position::at(line, column),
            text: text.to_string(),
        }
    }

    fn delete(line: usize, column: usize, text: &str) -> Action {
        Action::Delete {
            position: Position::at(line, column),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_simple_undo_redo() {
        let mut history = History::new();
        history.push(insert(1, 0, "hello"));
        history.commit_pending();

        assert!(history.can_undo());
        assert!(!history.can_redo());

        assert_eq!(history.undo(), Some(delete(1, 0, "hello")));
        assert!(!history.can_undo());
        assert!(history.can_redo());

        assert_eq!(history.redo(), Some(insert(1, 0, "hello")));
    }

    #[test]
    fn test_merge_inserts() {
        let mut history = History::new();
        history.push(insert(1, 0, "h"));
        history.push(insert(1, 1, "e"));
        history.push(insert(1, 2, "l"));
        history.commit_pending();

        assert_eq!(history.undo_stack.len(), 1);
        assert_eq!(history.undo(), Some(delete(1, 0, "hel")));
    }

    #[test]
    fn test_merge_deletes() {
        let mut history = History::new();
        history.push(delete(1, 3, "l"));
        history.push(delete(1, 2, "l"));
        history.push(delete(1, 1, "e"));
        history.commit_pending();

        assert_eq!(history.undo(), Some(insert(1, 1, "ell")));
    }

    #[test]
    fn test_newline_breaks_merge() {
        let mut history = History::new();
        history.push(insert(1, 0, "h"));
        history.push(insert(1, 1, "\n"));
        history.commit_pending();

        assert_eq!(history.undo_stack.len(), 2);
    }

    #[test]
    fn test_group_is_single_step() {
        let mut history = History::new();
        history.begin_group();
        history.push(delete(1, 0, "a"));
        history.push(insert(1, 0, "bb"));
        history.end_group();

        assert_eq!(history.undo_stack.len(), 1);
        assert_eq!(
            history.undo(),
            Some(Action::Group {
                actions: vec![delete(1, 0, "bb"), insert(1, 0, "a")],
            })
        );
        assert!(!history.can_undo());
    }

    #[test]
    fn test_single_action_group_still_merges() {
        let mut history = History::new();
        for (col, ch) in ["a", "b", "c"].iter().enumerate() {
            history.begin_group();
            history.push(insert(1, col, ch));
            history.end_group();
        }
        history.commit_pending();

        assert_eq!(history.undo_stack.len(), 1);
        assert_eq!(history.undo(), Some(delete(1, 0, "abc")));
    }

    #[test]
    fn test_nested_groups_flatten_into_outer() {
        let mut history = History::new();
        history.begin_group();
        history.push(insert(1, 0, "x"));
        history.begin_group();
        history.push(insert(1, 1, "y"));
        history.end_group();
        history.push(insert(1, 2, "z"));
        history.end_group();

        assert_eq!(history.undo_stack.len(), 1);
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut history = History::with_capacity(2);
        history.push(insert(1, 0, "\n"));
        history.push(insert(2, 0, "\n"));
        history.push(insert(3, 0, "\n"));
        history.commit_pending();

        assert_eq!(history.undo_stack.len(), 2);
        assert_eq!(history.undo(), Some(delete(3, 0, "\n")));
    }

    #[test]
    fn test_new_action_clears_redo() {
        let mut history = History::new();
        history.push(insert(1, 0, "a"));
        history.undo();
        assert!(history.can_redo());

        history.push(insert(1, 0, "b"));
        assert!(!history.can_redo());
    }
}

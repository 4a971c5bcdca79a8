//! Interactive guessing game
//!
//! One round walks the question tree from the root to a leaf, guesses the
//! leaf's item and, on a wrong guess, learns a new item by splitting that
//! leaf. Every round ends in the post-round menu.
//!
//! The session is an explicit state machine: [`GameEngine::step`] consumes at
//! most one line of input and returns the next [`State`]. Unrecognized input
//! returns the same state, so re-prompting never grows the stack and never
//! touches the tree.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{Answer, Item, NodeId, QuestionTree};
use crate::infrastructure::Terminal;

pub const INVALID_ANSWER: &str = "Please answer 'yes' or 'no'.";
pub const CORRECT_GUESS: &str = "Yay! I guessed it right!";
pub const LEARNED: &str = "Got it! I'll remember that for next time.";
pub const EMPTY_INPUT: &str = "Please enter a non-empty answer.";
pub const INVALID_CHOICE: &str = "Invalid choice. Please try again.";
pub const RESET_DONE: &str = "Game has been reset to initial state.";

/// Presentation settings for a game session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GameSettings {
    /// What the guessed things are called in prompts (default: "animal")
    pub item_label: String,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            item_label: "animal".into(),
        }
    }
}

impl GameSettings {
    /// Label with its first letter upper-cased, e.g. "Animal".
    pub fn title_label(&self) -> String {
        let mut chars = self.item_label.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The player picked "quit" from the menu
    Quit,
}

/// Progress through collecting a new item after a wrong guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LearnStage {
    Name,
    Question { name: Item },
    Answer { name: Item, question: String },
}

/// Position of the session state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    /// At a node that may still be a question
    Asking(NodeId),
    /// At a leaf, waiting for the guess to be confirmed or denied
    Guessing(NodeId),
    /// Wrong guess at `leaf`, collecting what to learn
    Learning { leaf: NodeId, stage: LearnStage },
    /// Round over, waiting for a menu choice
    Menu,
    Finished(SessionEnd),
}

/// Post-round menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    PlayAgain,
    ResetAndPlay,
    ListItems,
    Quit,
}

impl MenuChoice {
    /// Parse a menu selection; only `1` to `4` are recognized.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::PlayAgain),
            "2" => Some(MenuChoice::ResetAndPlay),
            "3" => Some(MenuChoice::ListItems),
            "4" => Some(MenuChoice::Quit),
            _ => None,
        }
    }
}

/// Drives the question tree through a [`Terminal`].
#[derive(Debug)]
pub struct GameEngine<T: Terminal> {
    settings: GameSettings,
    tree: QuestionTree,
    terminal: T,
}

impl<T: Terminal> GameEngine<T> {
    /// Session over the canonical seed tree.
    pub fn new(settings: GameSettings, terminal: T) -> Self {
        Self::with_tree(settings, QuestionTree::default(), terminal)
    }

    /// Session over an existing tree; its seed is what `run` and menu option 2 restore.
    pub fn with_tree(settings: GameSettings, tree: QuestionTree, terminal: T) -> Self {
        Self {
            settings,
            tree,
            terminal,
        }
    }

    pub fn tree(&self) -> &QuestionTree {
        &self.tree
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    pub fn into_parts(self) -> (QuestionTree, T) {
        (self.tree, self.terminal)
    }

    /// Play rounds until the player quits. Each session starts from the seed.
    #[instrument(level = "debug", skip(self))]
    pub fn run(&mut self) -> ApplicationResult<SessionEnd> {
        self.tree.reset();
        let banner = format!("Welcome to The {} Game!", self.settings.title_label());
        self.terminal.write_line(&banner).with_context("write banner")?;

        let mut state = State::Asking(self.tree.root());
        loop {
            state = match state {
                State::Finished(end) => {
                    info!(?end, items = self.tree.leaf_count(), "session finished");
                    return Ok(end);
                }
                current => self.step(current)?,
            };
        }
    }

    /// Advance the state machine by one transition.
    #[instrument(level = "trace", skip(self))]
    pub fn step(&mut self, state: State) -> ApplicationResult<State> {
        let next = match state {
            State::Asking(node) => self.ask(node)?,
            State::Guessing(leaf) => self.guess(leaf)?,
            State::Learning { leaf, stage } => self.learn(leaf, stage)?,
            State::Menu => self.menu()?,
            finished @ State::Finished(_) => finished,
        };
        debug!(?next, "transition");
        Ok(next)
    }

    fn ask(&mut self, node: NodeId) -> ApplicationResult<State> {
        if self.tree.is_leaf(node)? {
            return Ok(State::Guessing(node));
        }
        let prompt = format!("{} (yes/no): ", self.tree.question(node)?);
        match self.prompt_answer(&prompt)? {
            Some(answer) => Ok(State::Asking(self.tree.traverse(node, answer)?)),
            None => Ok(State::Asking(node)),
        }
    }

    fn guess(&mut self, leaf: NodeId) -> ApplicationResult<State> {
        let prompt = format!("Is it a {}? (yes/no): ", self.tree.item(leaf)?);
        match self.prompt_answer(&prompt)? {
            Some(Answer::Yes) => {
                self.say(CORRECT_GUESS)?;
                Ok(State::Menu)
            }
            Some(Answer::No) => Ok(State::Learning {
                leaf,
                stage: LearnStage::Name,
            }),
            None => Ok(State::Guessing(leaf)),
        }
    }

    fn learn(&mut self, leaf: NodeId, stage: LearnStage) -> ApplicationResult<State> {
        let stage = match stage {
            LearnStage::Name => {
                let prompt = format!("I give up! What is your {}? ", self.settings.item_label);
                self.terminal.write(&prompt).with_context("write prompt")?;
                match Item::new(self.read_input("read item name")?) {
                    Ok(name) => LearnStage::Question { name },
                    Err(_) => {
                        self.say(EMPTY_INPUT)?;
                        LearnStage::Name
                    }
                }
            }
            LearnStage::Question { name } => {
                let prompt = format!(
                    "What question distinguishes a {} from a {}?",
                    name,
                    self.tree.item(leaf)?
                );
                self.say(&prompt)?;
                let question = self.read_input("read question")?;
                let question = question.trim();
                if question.is_empty() {
                    self.say(EMPTY_INPUT)?;
                    LearnStage::Question { name }
                } else {
                    LearnStage::Answer {
                        name,
                        question: question.to_string(),
                    }
                }
            }
            LearnStage::Answer { name, question } => {
                let prompt = format!(
                    "For a {}, what is the answer to that question? (yes/no): ",
                    name
                );
                match self.prompt_answer(&prompt)? {
                    Some(answer) => {
                        info!(item = %name, %question, %answer, "learning new item");
                        self.tree.learn(leaf, name, &question, answer)?;
                        self.say(LEARNED)?;
                        return Ok(State::Menu);
                    }
                    None => LearnStage::Answer { name, question },
                }
            }
        };
        Ok(State::Learning { leaf, stage })
    }

    fn menu(&mut self) -> ApplicationResult<State> {
        let menu = format!(
            "What would you like to do next?\n\
             1. Play again\n\
             2. Reset memory and play again\n\
             3. List all {}s\n\
             4. Quit\n\
             Enter your choice (1/2/3/4): ",
            self.settings.item_label
        );
        self.terminal.write(&menu).with_context("write menu")?;

        let choice = self.read_input("read menu choice")?;
        match MenuChoice::parse(&choice) {
            Some(MenuChoice::PlayAgain) => Ok(State::Asking(self.tree.root())),
            Some(MenuChoice::ResetAndPlay) => {
                self.tree.reset();
                self.say(RESET_DONE)?;
                Ok(State::Asking(self.tree.root()))
            }
            Some(MenuChoice::ListItems) => {
                self.list_items()?;
                Ok(State::Menu)
            }
            Some(MenuChoice::Quit) => Ok(State::Finished(SessionEnd::Quit)),
            None => {
                self.say(INVALID_CHOICE)?;
                Ok(State::Menu)
            }
        }
    }

    fn list_items(&mut self) -> ApplicationResult<()> {
        let header = format!("{}s currently in memory:", self.settings.title_label());
        self.say(&header)?;
        for item in self.tree.items() {
            self.say(&format!("- {}", item))?;
        }
        Ok(())
    }

    /// Ask a yes/no question; None (after printing the hint) on anything else.
    fn prompt_answer(&mut self, prompt: &str) -> ApplicationResult<Option<Answer>> {
        self.terminal.write(prompt).with_context("write prompt")?;
        let input = self.read_input("read answer")?;
        let answer = Answer::parse(&input);
        if answer.is_none() {
            debug!(%input, "unrecognized answer");
            self.say(INVALID_ANSWER)?;
        }
        Ok(answer)
    }

    fn read_input(&mut self, action: &str) -> ApplicationResult<String> {
        self.terminal
            .read_line()
            .with_context(action)?
            .ok_or(ApplicationError::InputClosed)
    }

    fn say(&mut self, text: &str) -> ApplicationResult<()> {
        self.terminal.write_line(text).with_context("write message")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::StreamTerminal;
    use std::io::Cursor;

    type TestTerminal = StreamTerminal<Cursor<String>, Vec<u8>>;

    fn engine(input: &str) -> GameEngine<TestTerminal> {
        GameEngine::new(
            GameSettings::default(),
            StreamTerminal::new(Cursor::new(input.to_string()), Vec::new()),
        )
    }

    fn output(engine: GameEngine<TestTerminal>) -> String {
        let (_, terminal) = engine.into_parts();
        let (_, out) = terminal.into_inner();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn given_menu_tokens_when_parsing_then_maps_choices() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::PlayAgain));
        assert_eq!(MenuChoice::parse("2\n"), Some(MenuChoice::ResetAndPlay));
        assert_eq!(MenuChoice::parse(" 3 "), Some(MenuChoice::ListItems));
        assert_eq!(MenuChoice::parse("4"), Some(MenuChoice::Quit));
        assert_eq!(MenuChoice::parse("5"), None);
        assert_eq!(MenuChoice::parse("quit"), None);
    }

    #[test]
    fn given_label_when_title_cased_then_capitalizes_first_letter() {
        let settings = GameSettings {
            item_label: "fruit".into(),
        };
        assert_eq!(settings.title_label(), "Fruit");
        assert_eq!(GameSettings::default().title_label(), "Animal");
    }

    #[test]
    fn given_asking_at_root_when_input_is_invalid_then_state_unchanged() {
        let mut engine = engine("maybe\n");
        let root = engine.tree().root();

        let next = engine.step(State::Asking(root)).unwrap();

        assert_eq!(next, State::Asking(root));
        assert_eq!(engine.tree().len(), 3);
        let out = output(engine);
        assert!(out.ends_with(&format!("{}\n", INVALID_ANSWER)));
    }

    #[test]
    fn given_asking_at_leaf_when_stepping_then_guesses_without_reading() {
        let mut engine = engine("");
        let leaf = engine.tree().traverse(engine.tree().root(), Answer::Yes).unwrap();

        let next = engine.step(State::Asking(leaf)).unwrap();

        assert_eq!(next, State::Guessing(leaf));
        assert!(output(engine).is_empty());
    }

    #[test]
    fn given_guessing_when_input_is_invalid_then_state_unchanged() {
        let mut engine = engine("nope\n");
        let leaf = engine.tree().traverse(engine.tree().root(), Answer::No).unwrap();

        let next = engine.step(State::Guessing(leaf)).unwrap();

        assert_eq!(next, State::Guessing(leaf));
    }

    #[test]
    fn given_learning_name_when_blank_then_stays_in_name_stage() {
        let mut engine = engine("   \n");
        let leaf = engine.tree().traverse(engine.tree().root(), Answer::No).unwrap();

        let next = engine
            .step(State::Learning {
                leaf,
                stage: LearnStage::Name,
            })
            .unwrap();

        assert_eq!(
            next,
            State::Learning {
                leaf,
                stage: LearnStage::Name
            }
        );
        assert!(output(engine).contains(EMPTY_INPUT));
    }

    #[test]
    fn given_exhausted_input_when_stepping_then_input_closed() {
        let mut engine = engine("");
        let result = engine.step(State::Menu);
        assert!(matches!(result, Err(ApplicationError::InputClosed)));
    }

    #[test]
    fn given_finished_when_stepping_then_stays_finished() {
        let mut engine = engine("");
        let next = engine.step(State::Finished(SessionEnd::Quit)).unwrap();
        assert_eq!(next, State::Finished(SessionEnd::Quit));
    }
}

use crate::{
    error::Error,
    events::{self, Event, Events},
    game::GameState,
    layout::BoardLayout,
    sweep::{BoardConfig, Coordinate},
};
use num_traits::ToPrimitive;
use rand::{rngs::StdRng, Rng, SeedableRng};
use ratatui::{
    backend::TermionBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
    Frame, Terminal,
};
use std::{
    fmt, io,
    ops::ControlFlow,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Instant,
};
use termion::{
    event::{Event as TermEvent, Key, MouseButton, MouseEvent},
    input::MouseTerminal,
    raw::IntoRawMode,
    screen::IntoAlternateScreen,
};

const BOMB: &str = "💣";
const FLAG: &str = "⛳";

const WIN_TEXT: &str = "You Win!";
const LOSE_TEXT: &str = "Game Over!";

const HELP: [&str; 4] = [
    "reveal: left click",
    "flag: right click",
    "restart: r",
    "quit: q",
];

fn align_strings_to_char(strings: &[&str], c: char) -> Vec<String> {
    let (firsts, rests): (Vec<_>, Vec<_>) = strings
        .iter()
        .map(|&s| s.split_at(s.find(c).unwrap_or(s.len())))
        .unzip();
    let max_firsts = firsts.iter().map(|&f| f.len()).max().unwrap_or(0);
    let max_rests = rests.iter().map(|&r| r.len()).max().unwrap_or(0);
    firsts
        .into_iter()
        .zip(rests)
        .map(|(first, rest)| format!("{first:>max_firsts$}{rest:<max_rests$}"))
        .collect()
}

/// The part of `rect` that lies inside `area`, if any.
fn clip(rect: Rect, area: Rect) -> Option<Rect> {
    let clipped = rect.intersection(area);
    (clipped.area() > 0).then_some(clipped)
}

#[derive(typed_builder::TypedBuilder)]
pub(crate) struct Ui {
    board: BoardConfig,
    #[builder(default)]
    layout: BoardLayout,
    #[builder(default)]
    events: events::Config,
    #[builder(default)]
    seed: Option<u64>,
}

struct App {
    game: GameState,
    layout: BoardLayout,
    keys: events::Config,
}

struct CellView<'app> {
    game: &'app GameState,
    coord: Coordinate,
}

impl<'app> CellView<'app> {
    fn new(game: &'app GameState, coord: Coordinate) -> Self {
        Self { game, coord }
    }

    fn is_revealed(&self) -> bool {
        self.game
            .board()
            .cell(self.coord)
            .map_or(false, |cell| cell.revealed)
    }

    fn is_flagged(&self) -> bool {
        self.game
            .board()
            .cell(self.coord)
            .map_or(false, |cell| cell.flagged && !cell.revealed)
    }

    fn is_mine(&self) -> bool {
        self.game.board().is_mine(self.coord)
    }

    fn lost(&self) -> bool {
        self.game.is_game_over()
    }

    fn block(&self) -> Block<'_> {
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
    }

    fn text_style(&self) -> Style {
        if self.is_revealed() && self.is_mine() {
            Style::default().fg(Color::White).bg(Color::Red)
        } else if self.is_revealed() {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(if self.lost() && self.is_mine() {
                    Color::LightRed
                } else {
                    Color::Black
                })
                .bg(Color::Gray)
        }
    }
}

impl fmt::Display for CellView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_flagged() {
            write!(f, "{FLAG}")
        } else if self.is_mine() && (self.is_revealed() || self.lost()) {
            write!(f, "{BOMB}")
        } else if self.is_revealed() {
            match self.game.board().count_surrounding_mines(self.coord) {
                0 => write!(f, " "),
                count => write!(f, "{count}"),
            }
        } else {
            write!(f, " ")
        }
    }
}

impl App {
    fn new(game: GameState, layout: BoardLayout, keys: events::Config) -> Self {
        Self { game, layout, keys }
    }

    /// Applies a key press; breaks when the player asks to quit.
    fn key<R: Rng + ?Sized>(&mut self, key: Key, rng: &mut R) -> Result<ControlFlow<()>, Error> {
        if self.keys.is_exit(key) {
            return Ok(ControlFlow::Break(()));
        }
        if self.keys.is_restart(key) {
            self.game.restart(rng)?;
        }
        Ok(ControlFlow::Continue(()))
    }

    fn cell(&self, coord: Coordinate) -> CellView<'_> {
        CellView::new(&self.game, coord)
    }

    /// Applies a mouse press at a 1-based terminal position.
    fn click(&mut self, button: MouseButton, column: u16, row: u16) {
        let board = self.game.board();
        let Some(coord) = self.layout.cell_at(
            column.saturating_sub(1),
            row.saturating_sub(1),
            board.width(),
            board.height(),
        ) else {
            return;
        };

        match button {
            MouseButton::Left => {
                self.game.reveal(coord);
            }
            MouseButton::Right => {
                self.game.toggle_flag(coord);
            }
            _ => {}
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let area = frame.size();
        self.draw_status(frame, area);
        self.draw_board(frame, area);
        self.draw_help(frame, area);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let Some(rect) = self
            .layout
            .status_rect(self.game.board().width())
            .and_then(|rect| clip(rect, area))
        else {
            return;
        };

        let inner = if rect.height >= 3 {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(Span::styled(
                    "Minesweeper",
                    Style::default()
                        .fg(Color::LightYellow)
                        .add_modifier(Modifier::BOLD),
                ));
            let inner = block.inner(rect);
            frame.render_widget(block, rect);
            inner
        } else {
            rect
        };

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(inner);

        let mines = Paragraph::new(format!("Mines: {}", self.game.mines_remaining()));
        frame.render_widget(mines, columns[0]);

        let (outcome, color) = if self.game.is_game_won() {
            (WIN_TEXT, Color::LightGreen)
        } else if self.game.is_game_over() {
            (LOSE_TEXT, Color::LightRed)
        } else {
            ("", Color::Reset)
        };
        let outcome = Paragraph::new(outcome)
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        frame.render_widget(outcome, columns[1]);

        if self.game.started() {
            let time = Paragraph::new(format!(
                "Time: {:.1}",
                self.game.elapsed().as_secs_f64()
            ))
            .alignment(Alignment::Right);
            frame.render_widget(time, columns[2]);
        }
    }

    fn draw_board(&self, frame: &mut Frame, area: Rect) {
        let BoardLayout {
            cell_width,
            cell_height,
            ..
        } = self.layout;
        let bordered = cell_width >= 3 && cell_height >= 3;
        let inner_height = if bordered {
            cell_height - 2
        } else {
            cell_height
        };

        for coord in self.game.board().coordinates() {
            let Some(rect) = self
                .layout
                .cell_rect(coord)
                .and_then(|rect| clip(rect, area))
            else {
                continue;
            };

            let cell = self.cell(coord);

            // center the glyph vertically inside the cell
            let text = std::iter::repeat(String::new())
                .take(inner_height.saturating_sub(1) / 2)
                .chain(std::iter::once(cell.to_string()))
                .collect::<Vec<_>>()
                .join("\n");

            let mut paragraph = Paragraph::new(text)
                .alignment(Alignment::Center)
                .style(cell.text_style());
            if bordered {
                paragraph = paragraph.block(cell.block());
            }
            frame.render_widget(paragraph, rect);
        }
    }

    fn draw_help(&self, frame: &mut Frame, area: Rect) {
        let board = self.game.board();
        let (Ok((columns, rows)), Some(lines)) = (
            self.layout.terminal_size(board.width(), board.height()),
            HELP.len().to_u16(),
        ) else {
            return;
        };
        let Some(rect) = clip(Rect::new(0, rows, columns, lines), area) else {
            return;
        };

        let help = List::new(
            align_strings_to_char(&HELP, ':')
                .into_iter()
                .map(|line| format!("{:^width$}", line, width = usize::from(columns)))
                .map(ListItem::new)
                .collect::<Vec<_>>(),
        )
        .block(Block::default().borders(Borders::NONE));
        frame.render_widget(help, rect);
    }
}

impl Ui {
    pub(crate) fn run(&mut self) -> Result<(), Error> {
        let mut rng = self
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let (columns, rows) = self
            .layout
            .terminal_size(self.board.width, self.board.height)?;
        let mut app = App::new(
            GameState::new(self.board, &mut rng)?,
            self.layout,
            self.events,
        );
        log::info!("new game {:?}", self.board);

        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        ctrlc::set_handler(move || {
            running_clone.store(false, Ordering::SeqCst);
        })
        .map_err(Error::SetHandler)?;

        let events = Events::with_config(self.events);

        let stdout = io::stdout()
            .into_raw_mode()
            .map_err(Error::GetStdoutInRawMode)?
            .into_alternate_screen()
            .map_err(Error::GetAlternateScreenForMouseTerminal)?;
        let mouse_terminal = MouseTerminal::from(stdout);
        let backend = TermionBackend::new(mouse_terminal);
        let mut terminal = Terminal::new(backend).map_err(Error::CreateTerminal)?;

        let size = terminal.size().map_err(Error::DrawToTerminal)?;
        if size.width < columns || size.height < rows {
            log::warn!(
                "terminal is {}x{} but the board needs {columns}x{rows}, drawing clipped",
                size.width,
                size.height
            );
        }

        let mut last_tick = Instant::now();

        while running.load(Ordering::SeqCst) {
            app.game.refresh();
            terminal
                .draw(|frame| app.draw(frame))
                .map_err(Error::DrawToTerminal)?;

            match events.next().map_err(Error::GetEvent)? {
                Event::Tick => {
                    let now = Instant::now();
                    app.game.tick(now.duration_since(last_tick));
                    last_tick = now;
                }
                Event::Input(TermEvent::Key(key)) => {
                    if app.key(key, &mut rng)?.is_break() {
                        break;
                    }
                }
                Event::Input(TermEvent::Mouse(MouseEvent::Press(button, column, row))) => {
                    app.click(button, column, row);
                }
                Event::Input(_) => {}
            }
        }

        log::info!("quit with game {:?}", app.game.status());
        Ok(())
    }
}

use std::fmt::Write as _;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::{client::HotelClient, error::Result, store::Bookings};

const MENU: &str = "\
1. Book a room
2. Cancel booking
3. Show booked room details
4. Exit
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Book,
    Cancel,
    Show,
    Exit,
}

impl Choice {
    fn parse(input: &str) -> Option<Self> {
        match input.trim().parse::<u32>().ok()? {
            1 => Some(Self::Book),
            2 => Some(Self::Cancel),
            3 => Some(Self::Show),
            4 => Some(Self::Exit),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Step {
    Continue,
    Quit,
}

/// Interactive console front end of a [`HotelClient`].
///
/// Malformed numbers are answered with a message and a new prompt. Reaching
/// the end of the input behaves like choosing exit.
pub struct Menu<R, W> {
    client: HotelClient,
    input: R,
    output: W,
}

impl<R, W> Menu<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(client: HotelClient, input: R, output: W) -> Self {
        Self {
            client,
            input,
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs until the user exits or the input ends.
    ///
    /// Errors reaching the service abort the loop.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            self.print(MENU).await?;

            let Some(line) = self.prompt("Enter your choice: ").await? else {
                return Ok(());
            };

            let step = match Choice::parse(&line) {
                Some(Choice::Book) => self.book().await?,
                Some(Choice::Cancel) => self.cancel().await?,
                Some(Choice::Show) => self.show().await?,
                Some(Choice::Exit) => {
                    self.print("Exiting...\n").await?;
                    Step::Quit
                }
                None => {
                    self.print("Invalid choice.\n").await?;
                    Step::Continue
                }
            };

            if step == Step::Quit {
                return Ok(());
            }
        }
    }

    async fn book(&mut self) -> Result<Step> {
        let Some(guest_name) = self.prompt("Enter guest name: ").await? else {
            return Ok(Step::Quit);
        };

        let room_number = loop {
            let Some(line) = self.prompt("Enter room number: ").await? else {
                return Ok(Step::Quit);
            };
            match line.trim().parse::<u32>() {
                Ok(v) if v > 0 => break v,
                _ => self.print("Room number must be a positive integer.\n").await?,
            }
        };

        if self.client.book_room(&guest_name, room_number).await? {
            self.print("Room booked successfully!\n").await?;
        } else {
            self.print("Room booking failed.\n").await?;
        }

        Ok(Step::Continue)
    }

    async fn cancel(&mut self) -> Result<Step> {
        let Some(guest_name) = self.prompt("Enter guest name to cancel: ").await? else {
            return Ok(Step::Quit);
        };

        if self.client.cancel_booking(&guest_name).await? {
            self.print("Booking canceled successfully!\n").await?;
        } else {
            self.print("Cancellation failed.\n").await?;
        }

        Ok(Step::Continue)
    }

    async fn show(&mut self) -> Result<Step> {
        let bookings = self.client.list_bookings().await?;
        self.print(&render(&bookings)).await?;
        Ok(Step::Continue)
    }

    /// Prints `message` and reads one line without its line terminator.
    /// `None` once the input is exhausted.
    async fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        self.print(message).await?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }

        let len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(len);
        Ok(Some(line))
    }

    async fn print(&mut self, message: &str) -> Result<()> {
        self.output.write_all(message.as_bytes()).await?;
        self.output.flush().await?;
        Ok(())
    }
}

fn render(bookings: &Bookings) -> String {
    if bookings.is_empty() {
        return "No rooms are booked currently.\n".to_owned();
    }

    let mut table = String::from("Room No. | Guest Name\n");
    for (room_number, guest_name) in bookings {
        let _ = writeln!(table, "{room_number:<8} | {guest_name}");
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{service, store::BookingStore};

    #[test]
    fn parses_choices() {
        assert_eq!(Choice::parse("1"), Some(Choice::Book));
        assert_eq!(Choice::parse(" 4 "), Some(Choice::Exit));
        assert_eq!(Choice::parse("0"), None);
        assert_eq!(Choice::parse("5"), None);
        assert_eq!(Choice::parse("book"), None);
        assert_eq!(Choice::parse(""), None);
    }

    #[test]
    fn renders_table_in_room_order() {
        let bookings = Bookings::from([(205, "Bob".to_owned()), (12, "Alice".to_owned())]);

        assert_eq!(
            render(&bookings),
            "Room No. | Guest Name\n12       | Alice\n205      | Bob\n"
        );
        assert_eq!(render(&Bookings::new()), "No rooms are booked currently.\n");
    }

    async fn run_script(store: BookingStore, script: &str) -> String {
        let listener = service::serve("127.0.0.1:0".parse().unwrap(), store)
            .await
            .unwrap();
        let client = HotelClient::connect(listener.local_addr()).await.unwrap();

        let mut menu = Menu::new(client, script.as_bytes(), Vec::new());
        menu.run().await.unwrap();
        listener.shutdown();

        String::from_utf8(menu.into_output()).unwrap()
    }

    #[tokio::test]
    async fn books_and_lists() {
        let store = BookingStore::new();

        let output = run_script(store.clone(), "1\nAlice\n101\n1\nBob\n101\n3\n4\n").await;

        assert!(output.contains("Room booked successfully!"));
        assert!(output.contains("Room booking failed."));
        assert!(output.contains("101      | Alice"));
        assert!(output.ends_with("Exiting...\n"));
        assert_eq!(
            store.list_bookings().await,
            Bookings::from([(101, "Alice".to_owned())])
        );
    }

    #[tokio::test]
    async fn reprompts_on_malformed_numbers() {
        let store = BookingStore::new();

        let output = run_script(store.clone(), "abc\n9\n1\nAlice\nroom\n-3\n0\n7\n").await;

        assert_eq!(output.matches("Invalid choice.").count(), 2);
        assert_eq!(
            output
                .matches("Room number must be a positive integer.")
                .count(),
            3
        );
        assert!(output.contains("Room booked successfully!"));
        assert_eq!(store.list_bookings().await.get(&7).map(String::as_str), Some("Alice"));
    }

    #[tokio::test]
    async fn cancels_and_reports_empty_listing() {
        let store = BookingStore::new();
        store.book_room("Alice".to_owned(), 101).await;

        let output = run_script(store.clone(), "2\nBob\n2\nAlice\n3\n").await;

        assert!(output.contains("Cancellation failed."));
        assert!(output.contains("Booking canceled successfully!"));
        assert!(output.contains("No rooms are booked currently."));
        assert!(store.list_bookings().await.is_empty());
    }
}

//! Shared fixtures for Marquee integration tests.

pub mod fixtures {
    //! Canned OMDb responses and a one-shot HTTP responder.

    use std::net::SocketAddr;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// First page of an OMDb search for "batman".
    pub const BATMAN_PAGE_ONE: &str = r#"{
        "Search": [
            {"Title": "Batman Begins", "Year": "2005", "imdbID": "tt0372784", "Type": "movie", "Poster": "https://m.media-amazon.com/images/M/bb.jpg"},
            {"Title": "The Batman", "Year": "2022", "imdbID": "tt1877830", "Type": "movie", "Poster": "https://m.media-amazon.com/images/M/tb.jpg"},
            {"Title": "Batman v Superman: Dawn of Justice", "Year": "2016", "imdbID": "tt2975590", "Type": "movie", "Poster": "https://m.media-amazon.com/images/M/bvs.jpg"},
            {"Title": "Batman: The Animated Series", "Year": "1992-1995", "imdbID": "tt0103359", "Type": "series", "Poster": "N/A"}
        ],
        "totalResults": "587",
        "Response": "True"
    }"#;

    /// OMDb's answer when nothing matches.
    pub const NOT_FOUND: &str = r#"{"Response": "False", "Error": "Movie not found!"}"#;

    /// OMDb's answer to a missing or wrong key, sent with a 401 status.
    pub const INVALID_KEY: &str = r#"{"Response": "False", "Error": "Invalid API key!"}"#;

    /// Full record for Batman Begins.
    pub const BATMAN_BEGINS_DETAIL: &str = r#"{
        "Title": "Batman Begins", "Year": "2005", "Rated": "PG-13",
        "Released": "15 Jun 2005", "Runtime": "140 min",
        "Genre": "Action, Crime, Drama", "Director": "Christopher Nolan",
        "Writer": "Bob Kane, David S. Goyer, Christopher Nolan",
        "Actors": "Christian Bale, Michael Caine, Ken Watanabe",
        "Plot": "After witnessing his parents' death, Bruce learns the art of fighting to confront injustice.",
        "Language": "English, Mandarin", "Country": "United States, United Kingdom",
        "Awards": "Nominated for 1 Oscar. 14 wins & 79 nominations total",
        "Poster": "https://m.media-amazon.com/images/M/bb.jpg",
        "imdbRating": "8.2", "imdbVotes": "1,571,345", "imdbID": "tt0372784",
        "Type": "movie", "BoxOffice": "$206,863,479", "Response": "True"
    }"#;

    /// Serves exactly one HTTP response with `status_line` and JSON `body`.
    ///
    /// Returns the address to point the client at and a receiver yielding the
    /// raw request line the server saw.
    pub async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (SocketAddr, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener address");
        let (request_tx, request_rx) = oneshot::channel();

        tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };

            let mut buffer = vec![0u8; 8192];
            let mut read = 0;
            while !buffer[..read].windows(4).any(|w| w == b"\r\n\r\n") && read < buffer.len() {
                match socket.read(&mut buffer[read..]).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => read += n,
                }
            }
            let request = String::from_utf8_lossy(&buffer[..read]);
            let request_line = request.lines().next().unwrap_or_default().to_string();
            let _ = request_tx.send(request_line);

            let response = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });

        (addr, request_rx)
    }
}

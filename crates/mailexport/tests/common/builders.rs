//! Builder for test messages.

#![allow(dead_code)]

const BOUNDARY: &str = "mailexport-test-boundary";

/// Builds raw `.eml` content.
pub struct EmlBuilder {
    subject: Option<String>,
    date: Option<String>,
    body: String,
    attachments: Vec<(String, String)>,
}

impl EmlBuilder {
    /// A message with a body and nothing else.
    pub fn new() -> Self {
        Self {
            subject: None,
            date: None,
            body: "Hello there.".to_string(),
            attachments: Vec::new(),
        }
    }

    pub fn subject(mut self, subject: &str) -> Self {
        self.subject = Some(subject.to_string());
        self
    }

    /// RFC 2822 date, e.g. `Tue, 05 Mar 2024 14:30:15 +0000`.
    pub fn date(mut self, date: &str) -> Self {
        self.date = Some(date.to_string());
        self
    }

    pub fn body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    /// Adds a 7bit text attachment.
    pub fn attachment(mut self, filename: &str, content: &str) -> Self {
        self.attachments
            .push((filename.to_string(), content.to_string()));
        self
    }

    pub fn build(&self) -> String {
        let mut eml = String::from("From: Alice <alice@example.com>\r\nTo: bob@example.com\r\n");
        if let Some(subject) = &self.subject {
            eml.push_str(&format!("Subject: {}\r\n", subject));
        }
        if let Some(date) = &self.date {
            eml.push_str(&format!("Date: {}\r\n", date));
        }
        eml.push_str("MIME-Version: 1.0\r\n");

        if self.attachments.is_empty() {
            eml.push_str("Content-Type: text/plain; charset=utf-8\r\n\r\n");
            eml.push_str(&self.body);
            eml.push_str("\r\n");
            return eml;
        }

        eml.push_str(&format!(
            "Content-Type: multipart/mixed; boundary=\"{}\"\r\n\r\n",
            BOUNDARY
        ));
        eml.push_str(&format!(
            "--{}\r\nContent-Type: text/plain; charset=utf-8\r\n\r\n{}\r\n",
            BOUNDARY, self.body
        ));
        for (filename, content) in &self.attachments {
            eml.push_str(&format!(
                "--{}\r\nContent-Type: application/octet-stream\r\n\
                 Content-Disposition: attachment; filename=\"{}\"\r\n\
                 Content-Transfer-Encoding: 7bit\r\n\r\n{}\r\n",
                BOUNDARY, filename, content
            ));
        }
        eml.push_str(&format!("--{}--\r\n", BOUNDARY));
        eml
    }
}

impl Default for EmlBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#![expect(missing_docs)]

use llsd_codec::{MemoryStream, MimeIndex, MimeParser};

const MESSAGE: &[u8] = b"Content-Type: multipart/related; boundary=\"llsd\"\r\n\
MIME-Version: 1.0\r\n\
\r\n\
--llsd\r\n\
Content-Type: application/llsd+notation\r\n\
Content-Length: 10\r\n\
\r\n\
[i1,i2,i3]\r\n\
--llsd\r\n\
content-id: <part2>\r\n\
Content-Length: 6\r\n\
\r\n\
random\r\n\
--llsd--\r\n";

fn dump(index: &MimeIndex, depth: usize, lines: &mut Vec<String>) {
    let pad = "  ".repeat(depth);
    lines.push(format!(
        "{pad}offset={} length={} multipart={}",
        index.offset(),
        index.content_length(),
        index.is_multipart()
    ));
    for (name, value) in index.headers() {
        lines.push(format!("{pad}  {name}: {value}"));
    }
    for n in 0..index.sub_part_count() {
        let part = index.sub_part(n).expect("sub-part in range");
        dump(&part, depth + 1, lines);
    }
}

fn render(index: &MimeIndex) -> String {
    let mut lines = Vec::new();
    dump(index, 0, &mut lines);
    lines.join("\n")
}

#[test]
fn snapshot_multipart_index() {
    let mut index = MimeIndex::new();
    assert!(MimeParser::default().parse_buffer(MESSAGE, &mut index));

    insta::assert_snapshot!(render(&index), @r#"
    offset=71 length=-1 multipart=true
      Content-Type: multipart/related; boundary="llsd"
      MIME-Version: 1.0
      offset=142 length=10 multipart=false
        Content-Length: 10
        Content-Type: application/llsd+notation
      offset=204 length=6 multipart=false
        Content-ID: <part2>
        Content-Length: 6
    "#);

    let notation = index.sub_part(0).expect("first part");
    let start = notation.offset();
    let body = &MESSAGE[start..start + 10];
    let value = llsd_codec::from_notation(body).expect("notation body");
    assert_eq!(value.size(), 3);
}

#[test]
fn snapshot_truncated_index() {
    let mut stream = MemoryStream::new(MESSAGE);
    let mut parser = MimeParser::default();
    let index = parser.try_parse_index(&mut stream, 150).expect("partial index");

    insta::assert_snapshot!(render(&index), @r#"
    offset=71 length=-1 multipart=true
      Content-Type: multipart/related; boundary="llsd"
      MIME-Version: 1.0
      offset=142 length=10 multipart=false
        Content-Length: 10
        Content-Type: application/llsd+notation
    "#);
    assert_eq!(parser.scan_count(), 150);
}

#[test]
fn snapshot_errors() {
    let mut parser = MimeParser::default();
    let missing_colon = parser
        .try_parse_index(&mut MemoryStream::new(b"MIME-Version 1.0\r\n\r\n"), 20)
        .unwrap_err();
    let missing_crlf = parser
        .try_parse_index(&mut MemoryStream::new(b"Content-Length: 1\r\n\r\nxyz"), 24)
        .unwrap_err();

    insta::assert_snapshot!(missing_colon.to_string(), @"header line without a colon at byte 0");
    insta::assert_snapshot!(missing_crlf.to_string(), @"expected CRLF after content at byte 22");
}

//! 파일 라인 소스
//!
//! 로그 파일을 열어 한 줄씩 바이트열로 돌려주는 얇은 반복자입니다.
//! 줄은 `\n` 기준으로 자르며 끝의 줄바꿈은 그대로 둡니다 (패딩 제거는 파서 몫).
//! UTF-8이 아닌 바이트도 그대로 전달하므로 읽기 단계에서 실패하지 않습니다.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// 한 줄씩 읽는 라인 소스
pub struct LineSource<R> {
    reader: R,
}

impl LineSource<BufReader<File>> {
    /// 파일을 열어 라인 소스를 생성합니다.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> LineSource<R> {
    /// 임의의 버퍼드 리더로 라인 소스를 생성합니다.
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> Iterator for LineSource<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = Vec::new();
        match self.reader.read_until(b'\n', &mut line) {
            Ok(0) => None,
            Ok(_) => Some(Ok(line)),
            Err(e) => Some(Err(e)),
        }
    }
}

/// 파일의 각 라인에 대해 `f`를 호출합니다. 처리한 라인 수를 반환합니다.
pub fn for_each_line(
    path: impl AsRef<Path>,
    mut f: impl FnMut(&[u8]),
) -> io::Result<u64> {
    let mut count = 0;
    for line in LineSource::open(path)? {
        f(&line?);
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn yields_lines_in_order() {
        let source = LineSource::new(Cursor::new(b"a\nb\r\n\nlast".to_vec()));
        let lines: Vec<Vec<u8>> = source.map(Result::unwrap).collect();
        assert_eq!(
            lines,
            vec![b"a\n".to_vec(), b"b\r\n".to_vec(), b"\n".to_vec(), b"last".to_vec()]
        );
    }

    #[test]
    fn empty_input_yields_nothing() {
        let mut source = LineSource::new(Cursor::new(Vec::new()));
        assert!(source.next().is_none());
    }

    #[test]
    fn non_utf8_bytes_pass_through() {
        let mut source = LineSource::new(Cursor::new(vec![0xff, 0xfe, b'\n']));
        assert_eq!(source.next().unwrap().unwrap(), vec![0xff, 0xfe, b'\n']);
    }

    #[test]
    fn for_each_line_counts() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut tmp, b"one\ntwo\nthree\n").unwrap();

        let mut seen = Vec::new();
        let count = for_each_line(tmp.path(), |line| seen.push(line.to_vec())).unwrap();
        assert_eq!(count, 3);
        assert_eq!(seen[1], b"two\n");
    }

    #[test]
    fn open_missing_file_fails() {
        assert!(LineSource::open("/nonexistent/file.log").is_err());
    }
}

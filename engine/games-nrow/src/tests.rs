use super::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn board(s: &str) -> Board {
    s.parse().expect("test board should parse")
}

fn k(win_length: usize, size: usize) -> WinLength {
    WinLength::new(win_length, size).unwrap()
}

/// Random position with roughly balanced marks.
fn random_board(size: usize, rng: &mut ChaCha20Rng) -> Board {
    let cells = (0..size * size)
        .map(|_| match rng.gen_range(0..3) {
            0 => None,
            1 => Some(Mark::X),
            _ => Some(Mark::O),
        })
        .collect();
    Board::from_cells(size, cells).unwrap()
}

#[test]
fn test_mark_opponent_and_parse() {
    assert_eq!(Mark::X.opponent(), Mark::O);
    assert_eq!(Mark::O.opponent(), Mark::X);
    assert_eq!("x".parse::<Mark>().unwrap(), Mark::X);
    assert_eq!(" O ".parse::<Mark>().unwrap(), Mark::O);
    assert!("XO".parse::<Mark>().is_err());
    assert!("".parse::<Mark>().is_err());
}

#[test]
fn test_board_parse_and_display() {
    let b = board("XX. / OO. / ...");
    assert_eq!(b.size(), 3);
    assert_eq!(b.num_cells(), 9);
    assert_eq!(b.get(0), Some(Some(Mark::X)));
    assert_eq!(b.get(3), Some(Some(Mark::O)));
    assert_eq!(b.get(2), Some(None));
    assert_eq!(b.get(9), None);
    assert_eq!(b.to_string(), "XX.\nOO.\n...");
}

#[test]
fn test_board_parse_rejects_bad_input() {
    assert_eq!("XX.O.".parse::<Board>(), Err(BoardError::NotSquare(5)));
    assert_eq!("XXZ/.../...".parse::<Board>(), Err(BoardError::InvalidCell('Z')));
    assert_eq!("".parse::<Board>(), Err(BoardError::NotSquare(0)));
}

#[test]
fn test_from_cells_checks_length() {
    assert_eq!(
        Board::from_cells(3, vec![None; 8]),
        Err(BoardError::InvalidBoardSize {
            expected: 9,
            actual: 8
        })
    );
    assert_eq!(Board::from_cells(0, vec![]), Err(BoardError::ZeroSize));
    assert!(Board::from_cells(4, vec![None; 16]).is_ok());
}

#[test]
fn test_oversized_board_is_rejected() {
    let size = 1usize << (usize::BITS / 2 + 1);
    assert_eq!(Board::new(size), Err(BoardError::TooLarge(size)));
    assert_eq!(
        Board::from_cells(size, vec![None; 4]),
        Err(BoardError::InvalidBoardSize {
            expected: usize::MAX,
            actual: 4
        })
    );
}

#[test]
fn test_place_and_with_mark() {
    let mut b = Board::new(3).unwrap();
    b.place(4, Mark::X).unwrap();
    assert_eq!(b.place(4, Mark::O), Err(BoardError::Occupied(4)));
    assert_eq!(b.place(9, Mark::O), Err(BoardError::OutOfBounds(9)));

    let next = b.with_mark(0, Mark::O).unwrap();
    assert_eq!(next.count(Mark::O), 1);
    assert_eq!(b.count(Mark::O), 0); // source board untouched
    assert_eq!(next.empty_cells(), vec![1, 2, 3, 5, 6, 7, 8]);
}

#[test]
fn test_center_and_corners() {
    let b3 = Board::new(3).unwrap();
    assert_eq!(b3.center(), 4);
    assert_eq!(b3.corners(), [0, 2, 6, 8]);

    let b4 = Board::new(4).unwrap();
    assert_eq!(b4.center(), 10); // (2, 2)
    assert_eq!(b4.corners(), [0, 3, 12, 15]);
    assert_eq!(b4.coords(10), (2, 2));
    assert_eq!(b4.index(2, 2), 10);
}

#[test]
fn test_win_length_validation() {
    assert!(WinLength::new(3, 3).is_ok());
    assert!(WinLength::new(2, 3).is_ok());
    assert_eq!(
        WinLength::new(1, 3),
        Err(BoardError::InvalidWinLength {
            win_length: 1,
            size: 3
        })
    );
    assert!(WinLength::new(4, 3).is_err());
}

#[test]
fn test_default_win_length_table() {
    assert_eq!(WinLength::for_size(3).unwrap().get(), 3);
    assert_eq!(WinLength::for_size(4).unwrap().get(), 3);
    assert_eq!(WinLength::for_size(5).unwrap().get(), 4);
    assert_eq!(WinLength::for_size(6).unwrap().get(), 5);
    assert_eq!(WinLength::for_size(9).unwrap().get(), 5);
    assert_eq!(WinLength::for_size(2), Err(BoardError::UnsupportedSize(2)));
}

#[test]
fn test_custom_win_length_table() {
    let table = WinLengthTable::new([(5, 5), (3, 3)]).unwrap();
    assert_eq!(table.entries(), &[(3, 3), (5, 5)]);
    assert_eq!(table.lookup(4).unwrap().get(), 3);
    assert_eq!(table.lookup(7).unwrap().get(), 5);

    assert_eq!(
        WinLengthTable::new(Vec::new()),
        Err(BoardError::EmptyWinLengthTable)
    );
    assert!(WinLengthTable::new([(3, 4)]).is_err());
}

#[test]
fn test_lines_count_and_order() {
    // 3x3, K=3: 3 rows + 3 cols + 2 diagonals
    let all: Vec<Line> = lines(3, k(3, 3)).collect();
    assert_eq!(all.len(), 8);
    assert_eq!(all[0].cells(3).collect::<Vec<_>>(), vec![0, 1, 2]);
    assert_eq!(all[3].cells(3).collect::<Vec<_>>(), vec![0, 3, 6]);
    assert_eq!(all[6].cells(3).collect::<Vec<_>>(), vec![0, 4, 8]);
    assert_eq!(all[7].cells(3).collect::<Vec<_>>(), vec![2, 4, 6]);

    // 4x4, K=3: 4*2 rows + 4*2 cols + 2*2*2 diagonals
    assert_eq!(lines(4, k(3, 4)).count(), 24);
    // 6x6, K=5: 6*2 + 6*2 + 2*2*2
    assert_eq!(lines(6, k(5, 6)).count(), 32);
}

#[test]
fn test_find_winner_rows_columns_diagonals() {
    let k3 = k(3, 3);
    assert_eq!(find_winner(&board("XXX/OO./..."), k3), Some(Mark::X));
    assert_eq!(find_winner(&board("XO./XO./.O."), k3), Some(Mark::O));
    assert_eq!(find_winner(&board("X../OXO/..X"), k3), Some(Mark::X));
    assert_eq!(find_winner(&board("X.O/XO./O.."), k3), Some(Mark::O));
    assert_eq!(find_winner(&board("XX./OO./..."), k3), None);
    assert_eq!(find_winner(&Board::new(3).unwrap(), k3), None);
}

#[test]
fn test_find_winner_off_main_diagonals() {
    let k3 = k(3, 4);
    // down-right diagonal starting at (0, 1)
    assert_eq!(
        find_winner(&board(".X../..X./...X/...."), k3),
        Some(Mark::X)
    );
    // down-right diagonal starting at (1, 0)
    assert_eq!(
        find_winner(&board("..../O.../.O../..O."), k3),
        Some(Mark::O)
    );
    // down-left diagonal starting at (1, 3)
    assert_eq!(
        find_winner(&board("..../...X/..X./.X.."), k3),
        Some(Mark::X)
    );
    // down-left diagonal starting at (0, 2)
    assert_eq!(
        find_winner(&board("..O./.O../O.../...."), k3),
        Some(Mark::O)
    );
}

#[test]
fn test_find_winner_row_offset_on_larger_board() {
    // K=4 run not touching the left edge
    let b = board("...../.XXXX/...../...../.....");
    assert_eq!(find_winner(&b, k(4, 5)), Some(Mark::X));
    // A broken run of four does not count
    let b = board("...../XXX.X/...../...../.....");
    assert_eq!(find_winner(&b, k(4, 5)), None);
}

#[test]
fn test_find_winner_scan_order_prefers_rows() {
    // Both a row (O) and a column (X) are complete; rows come first.
    let b = board("XOOO/X.../X.../....");
    assert_eq!(find_winner(&b, k(3, 4)), Some(Mark::O));
}

#[test]
fn test_find_winner_invariant_under_rotation() {
    let mut rng = ChaCha20Rng::seed_from_u64(7);
    for size in 3..=6 {
        let win_length = WinLength::for_size(size).unwrap();
        for _ in 0..200 {
            let b = random_board(size, &mut rng);
            let rotated = b.rotated_180();
            // Same set of complete windows, so at least the existence of a
            // winner and, when only one mark has a line, its identity agree.
            let winners: Vec<Mark> = [Mark::X, Mark::O]
                .into_iter()
                .filter(|&m| lines(size, win_length).any(|l| owns(&b, l, m)))
                .collect();
            let found = find_winner(&rotated, win_length);
            match winners.as_slice() {
                [] => assert_eq!(found, None),
                [only] => assert_eq!(found, Some(*only)),
                _ => assert!(found.is_some()),
            }
        }
    }
}

fn owns(b: &Board, line: Line, mark: Mark) -> bool {
    line.cells(b.size()).all(|i| b.cells()[i] == Some(mark))
}

#[test]
fn test_is_full_and_draw() {
    let full = board("XOX/XOO/OXX");
    assert!(is_full(&full));
    assert_eq!(find_winner(&full, k(3, 3)), None);
    assert_eq!(status(&full, k(3, 3)), GameStatus::Draw);

    let open = board("XOX/XOO/OX.");
    assert!(!is_full(&open));
    assert_eq!(status(&open, k(3, 3)), GameStatus::InProgress);
    assert!(!status(&open, k(3, 3)).is_over());

    let won = board("XXX/OO./...");
    assert_eq!(status(&won, k(3, 3)), GameStatus::Won(Mark::X));
}

#[test]
fn test_near_win_count() {
    let k3 = k(3, 3);
    // X: row 0 (XX.), column 0 (X.. no), diagonal (X . .) no
    assert_eq!(near_win_count(&board("XX./.../..."), Mark::X, k3), 1);
    // X at 0 and 4: row? no. diagonal 0-4-8 yes
    assert_eq!(near_win_count(&board("X../.X./..."), Mark::X, k3), 1);
    // Blocked line does not count
    assert_eq!(near_win_count(&board("XXO/.../..."), Mark::X, k3), 0);
    // Fork: row 0 and column 0
    assert_eq!(near_win_count(&board("XX./X../..."), Mark::X, k3), 2);
    assert_eq!(near_win_count(&board("XX./X../..."), Mark::O, k3), 0);
}

#[test]
fn test_completes_line() {
    let k3 = k(3, 3);
    let b = board("XX./OO./...");
    assert!(completes_line(&b, 2, Mark::X, k3));
    assert!(completes_line(&b, 5, Mark::O, k3));
    assert!(!completes_line(&b, 5, Mark::X, k3));
    assert!(!completes_line(&b, 0, Mark::X, k3)); // occupied

    // Gap filling: X.X
    let b = board("X.X/.../...");
    assert!(completes_line(&b, 1, Mark::X, k3));

    // Anti-diagonal on 4x4 with K=3
    let b = board("..../...X/..X./....");
    assert!(completes_line(&b, 13, Mark::X, k(3, 4)));
}

#[test]
fn test_completes_line_agrees_with_find_winner() {
    let mut rng = ChaCha20Rng::seed_from_u64(11);
    for size in 3..=6 {
        let win_length = WinLength::for_size(size).unwrap();
        let mut checked = 0;
        while checked < 100 {
            let b = random_board(size, &mut rng);
            if find_winner(&b, win_length).is_some() {
                continue;
            }
            for idx in b.empty_cells() {
                for mark in [Mark::X, Mark::O] {
                    let placed = b.with_mark(idx, mark).unwrap();
                    assert_eq!(
                        completes_line(&b, idx, mark, win_length),
                        find_winner(&placed, win_length) == Some(mark),
                        "size={size} idx={idx} mark={mark}\n{b}"
                    );
                }
            }
            checked += 1;
        }
    }
}
